use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    Internal(String),
    ValidationError(String),
    ParseError(String),
    ConfigError(String),
    UpstreamError { status: u16, message: String },
    TransportError(String),
    IoError(String),
}

impl AppError {
    /// Bare message suitable for an `{"error": ...}` body.
    pub fn message(&self) -> &str {
        match self {
            AppError::Internal(msg)
            | AppError::ValidationError(msg)
            | AppError::ParseError(msg)
            | AppError::ConfigError(msg)
            | AppError::TransportError(msg)
            | AppError::IoError(msg) => msg,
            AppError::UpstreamError { message, .. } => message,
        }
    }

    /// HTTP status this error is surfaced with.
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::ValidationError(_) | AppError::ParseError(_) => 400,
            AppError::UpstreamError { status, .. } => *status,
            AppError::Internal(_)
            | AppError::ConfigError(_)
            | AppError::TransportError(_)
            | AppError::IoError(_) => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            AppError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::UpstreamError { status, message } => {
                write!(f, "Upstream error ({}): {}", status, message)
            }
            AppError::TransportError(msg) => write!(f, "Transport error: {}", msg),
            AppError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
