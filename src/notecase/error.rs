use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotecaseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// User input that cannot become a note or card.
    #[error("Invalid {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Link preview failed: {0}")]
    Preview(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Api(String),
}

impl NotecaseError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for NotecaseError {
    fn from(err: reqwest::Error) -> Self {
        NotecaseError::Preview(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotecaseError>;
