// --- File: crates/ashvault_admin/src/lib.rs ---
//! Admin side of Ashvault: locations and the operator approval queue.

pub mod doc;
pub mod error;
pub mod handlers;
pub mod locations;
pub mod routes;
pub mod service;
pub mod users;
#[cfg(test)]
mod users_test;

pub use error::AdminError;
pub use handlers::AdminState;
pub use service::AdminService;
