// --- File: crates/ashvault_reminders/src/error.rs ---
use ashvault_common::AshvaultError;
use ashvault_sms::SmsError;
use ashvault_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("Unknown timezone: {0}")]
    Timezone(String),

    #[error("Invalid reminder time {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    #[error("Reminder store error: {0}")]
    Store(#[from] StoreError),

    #[error(transparent)]
    Sms(#[from] SmsError),

    #[error("Reminder job unavailable: SMS sending is disabled")]
    Disabled,
}

impl From<ReminderError> for AshvaultError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::Timezone(_) | ReminderError::InvalidTime { .. } => {
                AshvaultError::ConfigError(err.to_string())
            }
            ReminderError::Store(store) => store.into(),
            ReminderError::Sms(sms) => sms.into(),
            ReminderError::Disabled => AshvaultError::Unavailable(err.to_string()),
        }
    }
}
