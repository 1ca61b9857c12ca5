use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZaldoError {
    #[error("Invalid input: {field} ({reason})")]
    InvalidInput { field: String, reason: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ZaldoError {
    fn from(e: serde_json::Error) -> Self {
        ZaldoError::SerializationError(e.to_string())
    }
}
