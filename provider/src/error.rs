use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("credential exchange failed: {0}")]
    Auth(String),

    #[error("session could not be opened: {0}")]
    SessionOpen(String),

    #[error("artifact submission failed: {0}")]
    Transport(String),

    #[error("artifact {path} unavailable: {reason}")]
    ArtifactUnavailable { path: String, reason: String },

    #[error("invalid provider configuration: {0}")]
    Config(String),
}
