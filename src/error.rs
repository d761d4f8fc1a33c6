//! Error types for diet planning operations
//!
//! Every error maps to an HTTP status code and a sanitized client message.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use warp::http::StatusCode;

/// Main error type for diet planning operations
#[derive(Debug, Error)]
pub enum DietError {
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{entity} not found")]
    NotFound { entity: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

/// JSON body returned for every failed request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

impl DietError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DietError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            DietError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            DietError::NotFound { .. } => StatusCode::NOT_FOUND,
            DietError::Conflict { .. } => StatusCode::CONFLICT,
            DietError::StorageError { .. } | DietError::InternalError { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client facing body. Server side failures are sanitized.
    pub fn to_error_body(&self) -> ErrorBody {
        let message = match self {
            DietError::InvalidInput { message } => message.clone(),
            DietError::Conflict { message } => message.clone(),
            DietError::InvalidCredentials | DietError::NotFound { .. } => self.to_string(),
            DietError::StorageError { .. } | DietError::InternalError { .. } => {
                sanitize_error_message(&self.to_string())
            }
        };

        ErrorBody { error: message }
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create not found error for `entity`
    pub fn not_found<S: Into<String>>(entity: S) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Create conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create storage error
    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    /// Create internal error
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }
}

static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(password|token|key|secret|salt)[=:]\s*\S+").expect("valid secret pattern")
});

static SENSITIVE_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[a-zA-Z0-9._/-]+/(secrets?|\.ssh|\.aws|\.config)/[a-zA-Z0-9._/-]+")
        .expect("valid path pattern")
});

const MAX_MESSAGE_LEN: usize = 500;

/// Redact secrets and sensitive paths, truncate to 500 bytes
fn sanitize_error_message(message: &str) -> String {
    let mut sanitized = SECRET_PATTERN
        .replace_all(message, "${1}=***")
        .to_string();

    sanitized = SENSITIVE_PATH_PATTERN
        .replace_all(&sanitized, "/***REDACTED***/")
        .to_string();

    if sanitized.len() > MAX_MESSAGE_LEN {
        let truncate_suffix = "...[truncated]";
        let mut cut = MAX_MESSAGE_LEN - truncate_suffix.len();
        while !sanitized.is_char_boundary(cut) {
            cut -= 1;
        }
        sanitized = format!("{}{}", &sanitized[..cut], truncate_suffix);
    }

    sanitized
}

/// Result type for diet planning operations
pub type DietResult<T> = Result<T, DietError>;
