use thiserror::Error;

/// Message used when a failure carries no description of its own.
pub const GENERIC_FAILURE: &str = "Failed to generate image.";

#[derive(Debug, Error)]
pub enum KuronekoError {
    #[error("{0}")]
    Validation(String),
    #[error("API Error: {status}")]
    Http { status: u16 },
    #[error("Failed to get image URL")]
    MissingImageUrl,
    #[error("Network error: {0}")]
    Network(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KuronekoError {
    /// Text shown to the user in the error toast.
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_string()
        } else {
            message
        }
    }
}

impl From<reqwest::Error> for KuronekoError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            KuronekoError::Http {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            KuronekoError::Serialization(e.to_string())
        } else {
            KuronekoError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for KuronekoError {
    fn from(e: serde_json::Error) -> Self {
        KuronekoError::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, KuronekoError>;
