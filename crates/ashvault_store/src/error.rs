//! Error types for the document store

use ashvault_common::AshvaultError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("document {collection}/{id} already exists")]
    AlreadyExists { collection: String, id: String },

    /// Obtaining the OAuth2 token failed
    #[error("store authentication error: {0}")]
    Auth(String),

    #[error("store request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Non-success answer from the Firestore REST API
    #[error("store API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("document (de)serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value that cannot be represented in the store
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A caller-supplied argument outside what the store can represent
    #[error("argument out of range: {0}")]
    OutOfRange(String),

    #[error("store configuration error: {0}")]
    Config(String),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

impl From<StoreError> for AshvaultError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => AshvaultError::NotFoundError(err.to_string()),
            StoreError::AlreadyExists { .. } => AshvaultError::ConflictError(err.to_string()),
            StoreError::Config(msg) => AshvaultError::ConfigError(msg),
            StoreError::OutOfRange(msg) => AshvaultError::ValidationError(msg),
            other => AshvaultError::DatabaseError(other.to_string()),
        }
    }
}
