// --- File: crates/ashvault_sms/src/error.rs ---
use ashvault_common::{external_service_error, AshvaultError};
use ashvault_store::StoreError;
use thiserror::Error;

/// Failure classification of a single gateway call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// HTTP 401 from the gateway
    #[error("SMS gateway authentication failed: {0}")]
    Authentication(String),

    /// HTTP 429 from the gateway
    #[error("SMS gateway rate limit exceeded: {0}")]
    RateLimit(String),

    /// Connection refused or DNS failure
    #[error("SMS gateway unreachable: {0}")]
    Network(String),

    /// Anything else, including `return: false` answers
    #[error("SMS gateway API error: {0}")]
    Api(String),
}

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Missing required variable {variable} for template {template}")]
    MissingVariable { variable: String, template: String },

    #[error("Invalid mobile number format: {0}")]
    InvalidMobileFormat(String),

    /// Validator findings, one message per problem
    #[error("Template variable validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("SMS store error: {0}")]
    Store(#[from] StoreError),

    #[error("SMS sending is disabled by configuration")]
    Disabled,

    #[error("SMS configuration error: {0}")]
    Config(String),
}

impl From<SmsError> for AshvaultError {
    fn from(err: SmsError) -> Self {
        match err {
            SmsError::TemplateNotFound(_) => AshvaultError::NotFoundError(err.to_string()),
            SmsError::MissingVariable { .. } | SmsError::InvalidMobileFormat(_) => {
                AshvaultError::ValidationError(err.to_string())
            }
            SmsError::Validation(errors) => AshvaultError::ValidationErrors(errors),
            SmsError::Gateway(GatewayError::RateLimit(msg)) => AshvaultError::RateLimitError(msg),
            SmsError::Gateway(gateway) => external_service_error("SMS gateway", gateway),
            SmsError::Store(store) => store.into(),
            SmsError::Disabled => AshvaultError::Unavailable(err.to_string()),
            SmsError::Config(msg) => AshvaultError::ConfigError(msg),
        }
    }
}
