// --- File: crates/services/ashvault_backend/src/lib.rs ---
//! The Ashvault HTTP server: state wiring, authentication and the merged router.

pub mod app;
#[cfg(test)]
mod app_test;
pub mod app_state;
pub mod auth;
#[cfg(test)]
mod auth_test;

pub use app::build_router;
pub use app_state::AppState;
