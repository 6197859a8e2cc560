use crate::errors::WakeError;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid JSON payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Wake(#[from] WakeError),
}
