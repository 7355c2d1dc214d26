// --- File: crates/ashvault_reminders/src/lib.rs ---
//! Daily expiry reminders: the job, its scheduler and manual triggers.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod job;
pub mod routes;
#[cfg(test)]
mod routes_test;
pub mod scheduler;
pub mod service;

pub use error::ReminderError;
pub use handlers::ReminderState;
pub use job::ReminderJob;
pub use service::{build_job, start_scheduler};
