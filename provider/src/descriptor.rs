//! Per-artifact descriptors sent alongside the binary parts.
//!
//! The provider expects a JSON array describing each uploaded file, in the
//! same order as the file parts: document front, document back, selfie.

use kyc_types::ArtifactSet;
use serde::{Deserialize, Serialize};

const DOCUMENT_INPUT: &str = "document-photo";
const SELFIE_INPUT: &str = "selfie-photo";

/// Which identity document is being submitted, and where it was issued.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentProfile {
    /// Provider document type, e.g. `national-id`.
    #[serde(default = "default_document_type")]
    pub document_type: String,
    /// Issuing jurisdiction as an ISO country code.
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_document_type() -> String {
    "national-id".to_string()
}

fn default_country() -> String {
    "PH".to_string()
}

impl Default for DocumentProfile {
    fn default() -> Self {
        Self {
            document_type: default_document_type(),
            country: default_country(),
        }
    }
}

/// Document page side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Front,
    Back,
}

/// Descriptor payload for one artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DescriptorData {
    Document {
        #[serde(rename = "type")]
        document_type: String,
        country: String,
        page: Page,
        filename: String,
    },
    Selfie {
        #[serde(rename = "type")]
        selfie_type: String,
        filename: String,
    },
}

/// One entry of the `inputs` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDescriptor {
    #[serde(rename = "inputType")]
    pub input_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<u32>,
    pub data: DescriptorData,
}

impl InputDescriptor {
    fn document(profile: &DocumentProfile, page: Page, filename: String) -> Self {
        Self {
            input_type: DOCUMENT_INPUT.to_string(),
            group: Some(0),
            data: DescriptorData::Document {
                document_type: profile.document_type.clone(),
                country: profile.country.clone(),
                page,
                filename,
            },
        }
    }

    fn selfie(filename: String) -> Self {
        Self {
            input_type: SELFIE_INPUT.to_string(),
            group: None,
            data: DescriptorData::Selfie {
                selfie_type: SELFIE_INPUT.to_string(),
                filename,
            },
        }
    }

    pub fn filename(&self) -> &str {
        match &self.data {
            DescriptorData::Document { filename, .. } | DescriptorData::Selfie { filename, .. } => {
                filename
            }
        }
    }
}

/// Build the three descriptors for an artifact set, in upload order.
///
/// The back page descriptor always names the artifact actually sent, so a
/// record without a back photo carries the fallback artifact's filename.
pub fn build_descriptors(profile: &DocumentProfile, artifacts: &ArtifactSet) -> Vec<InputDescriptor> {
    vec![
        InputDescriptor::document(profile, Page::Front, artifacts.front.filename()),
        InputDescriptor::document(profile, Page::Back, artifacts.back.filename()),
        InputDescriptor::selfie(artifacts.selfie.filename()),
    ]
}
