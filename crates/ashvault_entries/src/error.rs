// --- File: crates/ashvault_entries/src/error.rs ---
use ashvault_common::AshvaultError;
use ashvault_sms::SmsError;
use ashvault_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid OTP")]
    OtpMismatch,

    #[error("OTP expired")]
    OtpExpired,

    #[error("OTP attempts exhausted")]
    OtpAttemptsExceeded,

    #[error("OTP not verified for this entry")]
    OtpNotVerified,

    #[error("OTP already used")]
    OtpAlreadyUsed,

    #[error("Unknown timezone: {0}")]
    Timezone(String),

    /// Authorization failures from the caller checks
    #[error(transparent)]
    Access(#[from] AshvaultError),

    #[error("Entry store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sms(#[from] SmsError),
}

impl From<EntryError> for AshvaultError {
    fn from(err: EntryError) -> Self {
        match err {
            EntryError::NotFound(_) => AshvaultError::NotFoundError(err.to_string()),
            EntryError::InvalidInput(msg) => AshvaultError::ValidationError(msg),
            EntryError::Conflict(msg) => AshvaultError::ConflictError(msg),
            EntryError::OtpMismatch
            | EntryError::OtpExpired
            | EntryError::OtpAttemptsExceeded
            | EntryError::OtpNotVerified
            | EntryError::OtpAlreadyUsed => AshvaultError::ValidationError(err.to_string()),
            EntryError::Timezone(_) => AshvaultError::ConfigError(err.to_string()),
            EntryError::Access(inner) => inner,
            EntryError::Store(store) => store.into(),
            EntryError::Sms(sms) => sms.into(),
        }
    }
}

pub(crate) fn invalid<T: std::fmt::Display>(message: T) -> EntryError {
    EntryError::InvalidInput(message.to_string())
}
