//! Document store access for Ashvault
//!
//! The backend keeps all of its state in document collections (locations,
//! users, customers, entries, OTP records, SMS logs and bookkeeping). This
//! crate provides:
//!
//! - the [`DocumentStore`] trait and a structured [`Query`] model
//! - [`FirestoreStore`], speaking the Firestore REST v1 API with a service
//!   account (or the local emulator)
//! - [`MemoryStore`], an in-process store with the same semantics
//! - typed per-collection repositories over either of them
//!
//! # Example
//!
//! ```rust,no_run
//! use ashvault_store::{MemoryStore, Repositories};
//! use std::sync::Arc;
//!
//! async fn setup() {
//!     let repos = Repositories::new(Arc::new(MemoryStore::new()));
//!     let active = repos.locations.list(true).await;
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod factory;
pub mod firestore;
pub mod memory;
#[cfg(test)]
mod memory_test;
pub mod query;
pub mod repositories;
#[cfg(test)]
mod repositories_test;
pub mod value;

pub use client::{Document, DocumentStore};
pub use error::StoreError;
pub use factory::StoreFactory;
pub use firestore::FirestoreStore;
pub use memory::MemoryStore;
pub use query::{Direction, FilterOp, Query};
pub use repositories::Repositories;
