// --- File: crates/ashvault_sms/src/lib.rs ---
//! DLT template messaging for Ashvault.
//!
//! Holds the fixed template registry, the `var1|var2|...` formatter, the
//! pre-send validator and the dispatcher that retries the gateway a fixed
//! number of times while writing one `smsLogs` document per attempt.

pub mod dispatch;
pub mod doc;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod mobile;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;
pub mod routes;
pub mod service;
pub mod templates;
#[cfg(test)]
mod templates_proptest;
pub mod validation;
#[cfg(test)]
mod validation_test;

pub use dispatch::{RetryPolicy, SendOutcome, SendRequest, SmsDispatcher};
pub use error::{GatewayError, SmsError};
pub use gateway::{Fast2SmsGateway, SmsGateway};
pub use handlers::SmsState;
pub use service::build_dispatcher;
pub use templates::{SmsTemplate, TemplateCategory, TemplateVariables};
