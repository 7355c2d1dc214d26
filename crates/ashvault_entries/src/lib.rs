// --- File: crates/ashvault_entries/src/lib.rs ---
//! Everyday operations on stored ashes: intake, renewals, hand-back,
//! disposal, OTP confirmation, bulk import and the locker/dashboard views.

pub mod bulk_import;
#[cfg(test)]
mod bulk_import_test;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod notify;
pub mod otp;
pub mod routes;
#[cfg(test)]
mod routes_test;
pub mod service;
#[cfg(test)]
mod test_support;
pub mod views;
pub mod workflows;

pub use error::EntryError;
pub use handlers::EntriesState;
pub use service::EntryService;
