// --- File: crates/ashvault_common/src/services.rs ---
//! Shared building blocks for the service traits at the crate seams
//! (document store, SMS gateway).

use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;
