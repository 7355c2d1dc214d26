// --- File: crates/ashvault_sms/src/service.rs ---
use crate::dispatch::{RetryPolicy, SmsDispatcher};
use crate::error::SmsError;
use crate::gateway::{Fast2SmsGateway, SmsGateway};
use ashvault_common::is_sms_enabled;
use ashvault_config::{env_vars::SECRET_MARKER, AppConfig};
use ashvault_store::Repositories;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the dispatcher when SMS is enabled, `None` otherwise.
pub fn build_dispatcher(
    config: &AppConfig,
    repos: &Repositories,
) -> Result<Option<Arc<SmsDispatcher>>, SmsError> {
    if !is_sms_enabled(config) {
        info!("SMS sending disabled by configuration");
        return Ok(None);
    }
    let sms_config = config
        .sms
        .as_ref()
        .ok_or_else(|| SmsError::Config("[sms] section missing".into()))?;

    if sms_config.api_key.is_empty() || sms_config.api_key == SECRET_MARKER {
        warn!("SMS api_key is not set; gateway calls will fail authentication");
    }

    let gateway: Arc<dyn SmsGateway> = Arc::new(Fast2SmsGateway::from_config(sms_config)?);
    let policy = RetryPolicy::from(sms_config);
    info!(
        max_attempts = policy.max_attempts,
        retry_delay_ms = sms_config.retry_delay_ms,
        "SMS dispatcher ready"
    );
    Ok(Some(Arc::new(SmsDispatcher::new(
        gateway,
        repos.sms_logs.clone(),
        policy,
    ))))
}
