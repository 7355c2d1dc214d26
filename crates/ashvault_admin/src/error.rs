// --- File: crates/ashvault_admin/src/error.rs ---
use ashvault_common::AshvaultError;
use ashvault_sms::SmsError;
use ashvault_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Access(#[from] AshvaultError),

    #[error("Admin store error: {0}")]
    Store(#[from] StoreError),

    /// Contact numbers must be valid mobiles
    #[error(transparent)]
    Mobile(#[from] SmsError),
}

impl From<AdminError> for AshvaultError {
    fn from(err: AdminError) -> Self {
        match err {
            AdminError::NotFound(_) => AshvaultError::NotFoundError(err.to_string()),
            AdminError::InvalidInput(msg) => AshvaultError::ValidationError(msg),
            AdminError::Conflict(msg) => AshvaultError::ConflictError(msg),
            AdminError::Access(inner) => inner,
            AdminError::Store(store) => store.into(),
            AdminError::Mobile(sms) => sms.into(),
        }
    }
}
