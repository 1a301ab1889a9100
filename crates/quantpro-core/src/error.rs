use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuantProError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Domain error in {field}: {reason}")]
    DomainError { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl QuantProError {
    pub(crate) fn domain(field: &str, reason: impl Into<String>) -> Self {
        QuantProError::DomainError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for QuantProError {
    fn from(e: serde_json::Error) -> Self {
        QuantProError::SerializationError(e.to_string())
    }
}
