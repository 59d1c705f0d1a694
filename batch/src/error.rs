use thiserror::Error;

/// Errors that stop a batch run.
///
/// Per-record provider failures never appear here: they become outcomes.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("config error: {0}")]
    Config(String),

    #[error("record source error: {0}")]
    Source(#[from] kyc_types::KycError),

    #[error("audit log error: {0}")]
    Audit(#[from] kyc_audit::AuditError),

    #[error("governor error: {0}")]
    Governor(#[from] kyc_governor::GovernorError),

    #[error("provider setup error: {0}")]
    Provider(#[from] kyc_provider::ProviderError),
}
