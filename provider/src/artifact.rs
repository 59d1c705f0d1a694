//! Loading artifact content for upload.
//!
//! Content is read per submission and owned by the request being built, so
//! it is released as soon as the call returns, whatever the outcome.

use crate::error::ProviderError;
use kyc_types::ArtifactRef;
use reqwest::multipart::Part;

/// Binary content of one artifact plus the filename the provider sees.
pub struct LoadedArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl LoadedArtifact {
    /// Read the artifact's content from disk.
    pub async fn load(artifact: &ArtifactRef) -> Result<Self, ProviderError> {
        let bytes = tokio::fs::read(artifact.path()).await.map_err(|e| {
            ProviderError::ArtifactUnavailable {
                path: artifact.to_string(),
                reason: e.to_string(),
            }
        })?;
        Ok(Self {
            filename: artifact.filename(),
            bytes,
        })
    }

    /// Convert into a multipart file part.
    pub fn into_part(self) -> Result<Part, ProviderError> {
        let mime = mime_for(&self.filename);
        Part::bytes(self.bytes)
            .file_name(self.filename)
            .mime_str(mime)
            .map_err(|e| ProviderError::Transport(format!("invalid part type {mime}: {e}")))
    }
}

fn mime_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
