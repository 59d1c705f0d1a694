//! Batch configuration with TOML file support.

use kyc_governor::GovernorConfig;
use kyc_provider::ProviderConfig;
use kyc_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::BatchError;

/// Configuration for one batch run.
///
/// Can be loaded from a TOML file via [`BatchConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BatchConfig {
    /// CSV export of the input sheet.
    #[serde(default = "default_input")]
    pub input: PathBuf,

    /// Append-only audit log.
    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,

    /// Artifact submitted as the document back when a record has none.
    #[serde(default)]
    pub fallback_back: Option<PathBuf>,

    /// Number of leading data rows to skip (resume point).
    #[serde(default)]
    pub start_offset: u64,

    /// Maximum number of rows to process in this run.
    #[serde(default)]
    pub limit: Option<u64>,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Provider endpoint, credentials and document profile.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Rate ceiling.
    #[serde(default)]
    pub governor: GovernorConfig,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_input() -> PathBuf {
    PathBuf::from("input.csv")
}

fn default_audit_log() -> PathBuf {
    PathBuf::from("log.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl BatchConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, BatchError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BatchError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, BatchError> {
        toml::from_str(s).map_err(|e| BatchError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, BatchError> {
        toml::to_string_pretty(self).map_err(|e| BatchError::Config(e.to_string()))
    }

    /// Check everything a run needs is present before touching the provider.
    pub fn validate(&self) -> Result<(), BatchError> {
        let missing = self.provider.missing_fields();
        if !missing.is_empty() {
            return Err(BatchError::Config(format!(
                "missing provider settings: {}",
                missing.join(", ")
            )));
        }
        if self.fallback_back.is_none() {
            return Err(BatchError::Config(
                "fallback_back must name the artifact used when a record has no back photo".into(),
            ));
        }
        self.governor.validate()?;
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            audit_log: default_audit_log(),
            fallback_back: None,
            start_offset: 0,
            limit: None,
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            provider: ProviderConfig::default(),
            governor: GovernorConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
input = "sheets/batch-07.csv"
audit_log = "out/log.csv"
fallback_back = "defaults/4886023_doc_back.jpg"
start_offset = 1353
log_format = "json"

[provider]
client_id = "client"
client_secret = "secret"
flow_id = "flow-abc"

[provider.document]
country = "MX"

[governor]
batch_calls = 5
"#;

    #[test]
    fn parses_sample() {
        let config = BatchConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.input, PathBuf::from("sheets/batch-07.csv"));
        assert_eq!(config.start_offset, 1353);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.provider.document.country, "MX");
        assert_eq!(config.provider.document.document_type, "national-id");
        assert_eq!(config.governor.batch_calls, 5);
        assert_eq!(config.governor.min_spacing_secs, 15);
        assert_eq!(config.governor.batch_window_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = BatchConfig::from_toml_str("").unwrap();
        assert_eq!(config.audit_log, PathBuf::from("log.csv"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.limit, None);
    }

    #[test]
    fn validate_reports_missing_settings() {
        let err = BatchConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("client_id"));

        let mut config = BatchConfig::from_toml_str(SAMPLE).unwrap();
        config.fallback_back = None;
        assert!(matches!(config.validate(), Err(BatchError::Config(_))));

        let mut config = BatchConfig::from_toml_str(SAMPLE).unwrap();
        config.governor.batch_calls = 0;
        assert!(matches!(config.validate(), Err(BatchError::Governor(_))));
    }

    #[test]
    fn toml_roundtrip_keeps_limits() {
        let config = BatchConfig::from_toml_str(SAMPLE).unwrap();
        let reparsed = BatchConfig::from_toml_str(&config.to_toml_string().unwrap()).unwrap();
        assert_eq!(reparsed.governor, config.governor);
        assert_eq!(reparsed.start_offset, 1353);
    }
}
