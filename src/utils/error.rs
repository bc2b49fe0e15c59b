use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfiguration { field: String, reason: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Vision provider '{provider}' failed: {message}")]
    VisionProvider { provider: String, message: String },

    #[error("Repository operation failed: {message}")]
    Repository { message: String },

    #[error("Audit {audit_id} not found")]
    AuditNotFound { audit_id: Uuid },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl AuditError {
    /// Transient failures a caller may retry; configuration and input
    /// errors are permanent for the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AuditError::VisionProvider { .. }
                | AuditError::Repository { .. }
                | AuditError::HttpError(_)
                | AuditError::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
