use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernorError {
    #[error("invalid governor configuration: {0}")]
    InvalidConfig(String),
}
