//! Provider connection settings.

use crate::descriptor::DocumentProfile;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Settings for talking to the verification provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client identifier for the client-credentials grant.
    #[serde(default)]
    pub client_id: String,

    /// Client secret for the client-credentials grant.
    #[serde(default)]
    pub client_secret: String,

    /// Workflow every session is opened against.
    #[serde(default)]
    pub flow_id: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Connection timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Document type and jurisdiction stamped on document descriptors.
    #[serde(default)]
    pub document: DocumentProfile,
}

fn default_base_url() -> String {
    "https://api.getmati.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Names of required settings that are still empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.base_url.trim().is_empty() {
            missing.push("base_url");
        }
        if self.client_id.is_empty() {
            missing.push("client_id");
        }
        if self.client_secret.is_empty() {
            missing.push("client_secret");
        }
        if self.flow_id.is_empty() {
            missing.push("flow_id");
        }
        missing
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: String::new(),
            client_secret: String::new(),
            flow_id: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            document: DocumentProfile::default(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("flow_id", &self.flow_id)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("document", &self.document)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_hides_secret() {
        let config = ProviderConfig {
            client_secret: "hunter2".into(),
            ..Default::default()
        };
        assert!(!format!("{config:?}").contains("hunter2"));
    }

    #[test]
    fn missing_fields_reported() {
        let config = ProviderConfig {
            client_id: "id".into(),
            ..Default::default()
        };
        assert_eq!(config.missing_fields(), vec!["client_secret", "flow_id"]);
    }
}
