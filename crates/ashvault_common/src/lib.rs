// --- File: crates/ashvault_common/src/lib.rs ---

pub mod auth; // Authenticated caller and role checks
pub mod error; // Error handling
pub mod features; // Runtime feature switches
pub mod http; // HTTP utilities
pub mod logging; // Logging setup
pub mod models; // Domain documents
pub mod services; // Service trait building blocks
#[cfg(any(test, feature = "test-util"))]
pub mod testing; // Model builders for tests

pub use auth::Caller;

pub use error::{
    config_error, external_service_error, not_found, permission_denied, AshvaultError,
    HttpStatusCode,
};

pub use http::{client::create_client, IntoHttpResponse};

pub use features::{is_feature_enabled, is_reminders_enabled, is_sms_enabled};

pub use services::BoxFuture;
