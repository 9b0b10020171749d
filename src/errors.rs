use serde_json::json;
use thiserror::Error;
use worker::{Error as WorkerError, Response};

/// Failures raised by storage providers and the thumbnail policy.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{message}")]
    Validation { message: String },
    #[error("File size {size} bytes exceeds {max} byte limit")]
    SizeLimit { size: u64, max: u64 },
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("{operation} operation not supported by {provider} provider")]
    UnsupportedOperation {
        operation: &'static str,
        provider: &'static str,
    },
}

impl StorageError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Setup-time failures. Raised before any request or pointer event is handled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid {sensor} activation constraint: {reason}")]
    InvalidConstraint { sensor: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Worker error: {0}")]
    Worker(#[from] WorkerError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid thumbnail: {0}")]
    InvalidThumbnail(#[source] StorageError),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = std::result::Result<T, AppError>;

impl AppError {
    /// HTTP status reported to clients for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Storage(StorageError::Validation { .. }) => 400,
            AppError::Storage(StorageError::SizeLimit { .. }) => 413,
            AppError::Storage(StorageError::UnsupportedOperation { .. }) => 501,
            AppError::Storage(StorageError::Io(_)) => 500,
            AppError::InvalidThumbnail(_) | AppError::BadRequest(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::PayloadTooLarge(_) => 413,
            AppError::Worker(_) | AppError::Config(_) | AppError::Internal(_) => 500,
        }
    }

    /// Renders the error as a JSON body `{"error": message}` with its status code.
    pub fn to_response(&self) -> worker::Result<Response> {
        Ok(Response::from_json(&json!({ "error": self.to_string() }))?
            .with_status(self.status_code()))
    }
}

impl From<AppError> for WorkerError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Worker(e) => e,
            other => WorkerError::RustError(other.to_string()),
        }
    }
}
