// --- File: crates/ashvault_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Ashvault crates.
///
/// Each crate keeps its own `thiserror` enum and implements
/// `From<CrateError> for AshvaultError` so handlers can answer uniformly.
#[derive(Error, Debug)]
pub enum AshvaultError {
    /// Error occurred during an HTTP request
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Error occurred while parsing data
    #[error("Failed to parse data: {0}")]
    ParseError(String),

    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The caller could not be authenticated
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// The caller is authenticated but not allowed to do this
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A single validation failure
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Several validation failures, reported together
    #[error("Validation failed: {}", .0.join("; "))]
    ValidationErrors(Vec<String>),

    /// Error occurred during a document store operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a conflict (e.g., locker already booked)
    #[error("Conflict: {0}")]
    ConflictError(String),

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// The feature is switched off in the configuration
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Error occurred due to rate limiting
    #[error("Rate limited: {0}")]
    RateLimitError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for AshvaultError {
    fn status_code(&self) -> u16 {
        match self {
            AshvaultError::HttpError(_) => 500,
            AshvaultError::ParseError(_) => 400,
            AshvaultError::ConfigError(_) => 500,
            AshvaultError::AuthError(_) => 401,
            AshvaultError::PermissionDenied(_) => 403,
            AshvaultError::ValidationError(_) => 400,
            AshvaultError::ValidationErrors(_) => 400,
            AshvaultError::DatabaseError(_) => 500,
            AshvaultError::ExternalServiceError { .. } => 502,
            AshvaultError::ConflictError(_) => 409,
            AshvaultError::NotFoundError(_) => 404,
            AshvaultError::Unavailable(_) => 503,
            AshvaultError::RateLimitError(_) => 429,
            AshvaultError::InternalError(_) => 500,
        }
    }
}

impl AshvaultError {
    /// Whether the detail of this error should be hidden from the client.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AshvaultError::InternalError(_)
                | AshvaultError::DatabaseError(_)
                | AshvaultError::ConfigError(_)
                | AshvaultError::HttpError(_)
        )
    }
}

// Common error conversions
impl From<reqwest::Error> for AshvaultError {
    fn from(err: reqwest::Error) -> Self {
        AshvaultError::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for AshvaultError {
    fn from(err: serde_json::Error) -> Self {
        AshvaultError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AshvaultError {
    fn from(err: std::io::Error) -> Self {
        AshvaultError::InternalError(err.to_string())
    }
}

// Utility functions for error handling
pub fn config_error<T: fmt::Display>(message: T) -> AshvaultError {
    AshvaultError::ConfigError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> AshvaultError {
    AshvaultError::NotFoundError(message.to_string())
}

pub fn permission_denied<T: fmt::Display>(message: T) -> AshvaultError {
    AshvaultError::PermissionDenied(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> AshvaultError {
    AshvaultError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}
