use std::fmt;

/// Why a staged index failed validation in [`build`](crate::IndexMetadataBuilder::build).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    Missing,
    Negative(i64),
    NotANumber(String),
    Overflow,
    EmptyName,
}

impl fmt::Display for ValidationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationReason::Missing => write!(f, "must be specified"),
            ValidationReason::Negative(v) => write!(f, "must not be negative (got {})", v),
            ValidationReason::NotANumber(v) => write!(f, "must be an integer (got '{}')", v),
            ValidationReason::Overflow => write!(f, "is too large"),
            ValidationReason::EmptyName => write!(f, "must not be empty"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid {field} for index [{index}]: {reason}")]
    Validation {
        index: String,
        field: &'static str,
        reason: ValidationReason,
    },

    #[error("Stream ended early while reading {context}")]
    TruncatedStream { context: &'static str },

    #[error("Malformed index metadata text: {0}")]
    MalformedText(String),

    #[error("Invalid data in stream: {0}")]
    InvalidData(String),

    #[error("Setting '{key}' is not an integer: '{value}'")]
    InvalidSetting { key: String, value: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Error::Io(err.into()),
            _ => Error::MalformedText(err.to_string()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
