//! Template sending with a fixed retry loop and a per-attempt audit log.
//!
//! Every attempt, successful or not, appends one document to `smsLogs`.
//! Attempts are spaced by a constant delay; every gateway error is retried
//! the same way.

use crate::error::SmsError;
use crate::gateway::SmsGateway;
use crate::mobile::clean_and_validate;
use crate::templates::{format_variables_for_api, get_template_by_key, TemplateVariables};
use crate::validation::validate_template_variables;
use ashvault_common::models::{SmsLog, SmsStatus};
use ashvault_config::SmsConfig;
use ashvault_store::repositories::SmsLogRepository;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(5000),
        }
    }
}

impl From<&SmsConfig> for RetryPolicy {
    fn from(config: &SmsConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// One message to send, with the references copied into the audit log.
#[derive(Debug, Clone, Default)]
pub struct SendRequest {
    pub recipient: String,
    pub template_key: String,
    pub variables: TemplateVariables,
    pub entry_id: Option<String>,
    pub customer_id: Option<String>,
    pub location_id: Option<String>,
    pub operator_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendOutcome {
    pub success: bool,
    pub message_id: Option<String>,
    /// Attempts made, including the successful one.
    pub attempts: u32,
    /// Last gateway error when every attempt failed.
    pub error: Option<String>,
    pub recipient: String,
    pub template_id: String,
}

pub struct SmsDispatcher {
    gateway: Arc<dyn SmsGateway>,
    logs: SmsLogRepository,
    policy: RetryPolicy,
}

impl SmsDispatcher {
    pub fn new(gateway: Arc<dyn SmsGateway>, logs: SmsLogRepository, policy: RetryPolicy) -> Self {
        Self {
            gateway,
            logs,
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Validate, format and send a template message.
    ///
    /// Validation problems, unknown templates and bad recipients are errors
    /// before anything is sent. Gateway failures are not errors: they come
    /// back as an unsuccessful [`SendOutcome`] once the attempts run out.
    pub async fn send_template(&self, request: &SendRequest) -> Result<SendOutcome, SmsError> {
        let template = get_template_by_key(&request.template_key)
            .ok_or_else(|| SmsError::TemplateNotFound(request.template_key.clone()))?;

        let validation = validate_template_variables(&request.template_key, &request.variables);
        if !validation.is_valid {
            return Err(SmsError::Validation(validation.errors));
        }

        let variables_values = format_variables_for_api(&request.template_key, &request.variables)?;
        let recipient = clean_and_validate(&request.recipient)?;

        let mut last_error = None;
        for attempt in 1..=self.policy.max_attempts {
            let result = self
                .gateway
                .send(&recipient, &template.id, &variables_values)
                .await;

            let (status, message_id, error_message) = match &result {
                Ok(id) => (SmsStatus::Sent, Some(id.clone()), None),
                Err(e) => (SmsStatus::Failed, None, Some(e.to_string())),
            };
            self.write_log(
                request,
                &recipient,
                &template.id,
                &variables_values,
                attempt,
                status,
                message_id,
                error_message,
            )
            .await;

            match result {
                Ok(message_id) => {
                    info!(
                        template = %request.template_key,
                        recipient = %recipient,
                        attempt,
                        message_id = %message_id,
                        "SMS sent"
                    );
                    return Ok(SendOutcome {
                        success: true,
                        message_id: Some(message_id),
                        attempts: attempt,
                        error: None,
                        recipient,
                        template_id: template.id.clone(),
                    });
                }
                Err(e) => {
                    warn!(
                        template = %request.template_key,
                        recipient = %recipient,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        error = %e,
                        "SMS attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.policy.max_attempts {
                        tokio::time::sleep(self.policy.delay).await;
                    }
                }
            }
        }

        error!(
            template = %request.template_key,
            recipient = %recipient,
            attempts = self.policy.max_attempts,
            "SMS failed after all attempts"
        );
        Ok(SendOutcome {
            success: false,
            message_id: None,
            attempts: self.policy.max_attempts,
            error: last_error.map(|e| e.to_string()),
            recipient,
            template_id: template.id.clone(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    async fn write_log(
        &self,
        request: &SendRequest,
        recipient: &str,
        template_id: &str,
        variables_values: &str,
        attempt: u32,
        status: SmsStatus,
        message_id: Option<String>,
        error_message: Option<String>,
    ) {
        let log = SmsLog {
            id: String::new(),
            recipient: recipient.to_string(),
            template_key: request.template_key.clone(),
            template_id: template_id.to_string(),
            message: variables_values.to_string(),
            status,
            error_message,
            message_id,
            retry_count: attempt - 1,
            attempt,
            entry_id: request.entry_id.clone(),
            customer_id: request.customer_id.clone(),
            location_id: request.location_id.clone(),
            operator_id: request.operator_id.clone(),
            timestamp: Utc::now(),
        };
        // An audit write failure must not change the send result.
        if let Err(e) = self.logs.append(log).await {
            error!(error = %e, attempt, "Failed to write SMS log");
        }
    }
}
