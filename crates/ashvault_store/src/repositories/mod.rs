//! Per-collection repositories.
//!
//! Each repository is a thin typed wrapper around a shared
//! [`DocumentStore`]; none of them enforce invariants beyond what the
//! store itself gives.

pub mod customers;
pub mod entries;
pub mod locations;
pub mod otp;
pub mod runs;
pub mod sms_logs;
pub mod users;

use crate::client::{Document, DocumentStore};
use crate::error::StoreError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub use customers::CustomerRepository;
pub use entries::{EntryFilter, EntryRepository};
pub use locations::LocationRepository;
pub use otp::OtpRepository;
pub use runs::{FunctionCallRepository, ReminderRunRepository, SystemStatsRepository};
pub use sms_logs::{SmsLogFilter, SmsLogRepository, SmsStatistics, TemplateStatistics};
pub use users::UserRepository;

/// Serialize a model for writing; the `id` field lives in the document name.
pub(crate) fn encode<T: Serialize>(model: &T) -> Result<Value, StoreError> {
    let mut value = serde_json::to_value(model)?;
    if let Some(map) = value.as_object_mut() {
        map.remove("id");
    }
    Ok(value)
}

/// Deserialize a stored document, putting its id back in.
pub(crate) fn decode<T: DeserializeOwned>(doc: Document) -> Result<T, StoreError> {
    let mut data = doc.data;
    if let Some(map) = data.as_object_mut() {
        map.insert("id".to_string(), Value::String(doc.id));
    }
    Ok(serde_json::from_value(data)?)
}

pub(crate) fn decode_all<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(decode).collect()
}

/// All repositories over one store.
#[derive(Clone)]
pub struct Repositories {
    pub store: Arc<dyn DocumentStore>,
    pub locations: LocationRepository,
    pub users: UserRepository,
    pub customers: CustomerRepository,
    pub entries: EntryRepository,
    pub otp: OtpRepository,
    pub sms_logs: SmsLogRepository,
    pub function_calls: FunctionCallRepository,
    pub reminder_runs: ReminderRunRepository,
    pub system_stats: SystemStatsRepository,
}

impl Repositories {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            locations: LocationRepository::new(store.clone()),
            users: UserRepository::new(store.clone()),
            customers: CustomerRepository::new(store.clone()),
            entries: EntryRepository::new(store.clone()),
            otp: OtpRepository::new(store.clone()),
            sms_logs: SmsLogRepository::new(store.clone()),
            function_calls: FunctionCallRepository::new(store.clone()),
            reminder_runs: ReminderRunRepository::new(store.clone()),
            system_stats: SystemStatsRepository::new(store.clone()),
            store,
        }
    }
}
