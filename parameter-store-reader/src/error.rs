use thiserror::Error;

/// Every failure is terminal: the binary reports it and exits non-zero.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to set up AWS session: {0}")]
    Credential(String),

    #[error("Failed to read from parameter store: {0}")]
    Remote(String),

    #[error("Parameter '{name}' not found")]
    NotFound { name: String },

    #[error("No parameter found using {path}")]
    EmptyResult { path: String },

    #[error("Output format '{format}' is not valid, expected one of: {}", crate::format::valid_formats().join(", "))]
    UnsupportedFormat { format: String },

    #[error("Key '{key}' conflicts with another parameter path: {reason}")]
    Conflict { key: String, reason: &'static str },

    #[error("More than one parameter maps to key '{key}'")]
    KeyCollision { key: String },

    #[error("Failed to serialize output: {0}")]
    Serialization(String),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ReaderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ReaderError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
