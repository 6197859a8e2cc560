use std::io;

#[derive(Debug, thiserror::Error)]
pub enum WakeError {
    #[error("{0:?} is not an IEEE 802 MAC-48 address")]
    InvalidAddress(String),

    #[error("unable to resolve {0}")]
    Resolution(String),

    #[error("transmission failed: {0}")]
    Transmission(#[from] io::Error),
}
