//! Verification records and their artifact references.

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A reference to a binary artifact (document photo or selfie).
///
/// The reference resolves to file content plus a filename; the filename is
/// what the provider sees in the per-artifact descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactRef(PathBuf);

impl ArtifactRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// Base name of the artifact, as sent to the provider.
    ///
    /// Falls back to the full reference when it has no final component.
    pub fn filename(&self) -> String {
        self.0
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.0.to_string_lossy().into_owned())
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for ArtifactRef {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One unit of work: a person's verification request.
///
/// Immutable once read from the source.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationRecord {
    /// Zero-based data row index in the source.
    pub row: u64,
    pub metadata: Metadata,
    pub front: ArtifactRef,
    /// Back of the identity document. `None` means the configured fallback
    /// artifact is submitted in its place.
    pub back: Option<ArtifactRef>,
    pub selfie: ArtifactRef,
}

impl VerificationRecord {
    /// Resolve the three artifacts to submit, substituting `fallback_back`
    /// when the record carries no back-of-document reference.
    pub fn artifacts(&self, fallback_back: &ArtifactRef) -> ArtifactSet {
        ArtifactSet {
            front: self.front.clone(),
            back: self.back.clone().unwrap_or_else(|| fallback_back.clone()),
            selfie: self.selfie.clone(),
        }
    }
}

/// The resolved artifacts for one submission: front, back (or fallback), selfie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactSet {
    pub front: ArtifactRef,
    pub back: ArtifactRef,
    pub selfie: ArtifactRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(back: Option<&str>) -> VerificationRecord {
        VerificationRecord {
            row: 0,
            metadata: Metadata::empty(),
            front: ArtifactRef::from("docs/1001_front.jpg"),
            back: back.map(ArtifactRef::from),
            selfie: ArtifactRef::from("docs/1001_selfie.jpg"),
        }
    }

    #[test]
    fn filename_is_base_name() {
        assert_eq!(ArtifactRef::from("a/b/c/photo.jpg").filename(), "photo.jpg");
        assert_eq!(ArtifactRef::from("photo.jpg").filename(), "photo.jpg");
    }

    #[test]
    fn missing_back_uses_fallback() {
        let fallback = ArtifactRef::from("defaults/generic_back.jpg");
        let set = record(None).artifacts(&fallback);
        assert_eq!(set.back, fallback);
        assert_eq!(set.back.filename(), "generic_back.jpg");
    }

    #[test]
    fn present_back_is_kept() {
        let fallback = ArtifactRef::from("defaults/generic_back.jpg");
        let set = record(Some("docs/1001_back.jpg")).artifacts(&fallback);
        assert_eq!(set.back.filename(), "1001_back.jpg");
    }
}
