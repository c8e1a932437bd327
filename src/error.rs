use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    Input(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {timeout:?}")]
    Timeout { timeout: Duration },

    #[error("Request failed: HTTP {status}")]
    Remote { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid state transition: {current} -> {requested}")]
    InvalidTransition { current: String, requested: String },
}

/// Coarse classification used by the input surface to pick a message style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Network,
    Remote,
    Serialization,
    Config,
    Internal,
}

impl Error {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Input(_) | Self::Csv(_) => ErrorKind::Input,
            Self::Network(_) | Self::Timeout { .. } => ErrorKind::Network,
            Self::Remote { .. } => ErrorKind::Remote,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Config(_) | Self::Yaml(_) | Self::Io(_) => ErrorKind::Config,
            Self::InvalidTransition { .. } => ErrorKind::Internal,
        }
    }
}
