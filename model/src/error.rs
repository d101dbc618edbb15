use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Type mismatch for field {field}: {message}")]
    TypeMismatch { field: String, message: String },

    #[error("Expected a JSON object, found {found}")]
    NotAnObject { found: String },

    #[error("Invalid timestamp {value}: {message}")]
    InvalidTimestamp { value: String, message: String },

    #[error("Invalid object path: {path}")]
    InvalidObjectPath { path: String },

    #[error("Invalid artifact pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Encoded output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
