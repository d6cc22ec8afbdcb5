use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MurmurError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("{0}")]
    Validation(String),

    #[error("Not signed in")]
    NoIdentity,
}

impl MurmurError {
    /// True for errors raised before any remote call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, MurmurError::Validation(_) | MurmurError::NoIdentity)
    }
}

impl From<serde_json::Error> for MurmurError {
    fn from(err: serde_json::Error) -> Self {
        MurmurError::Json(err.to_string())
    }
}

impl From<io::Error> for MurmurError {
    fn from(err: io::Error) -> Self {
        MurmurError::Io(err.to_string())
    }
}

impl From<reqwest::Error> for MurmurError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MurmurError::Decode(err.to_string())
        } else {
            MurmurError::Network(err.to_string())
        }
    }
}
