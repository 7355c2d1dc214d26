// --- File: crates/ashvault_entries/src/notify.rs ---
//! Confirmation messages sent after a workflow step has been saved.
//! A failed message never undoes the step.

use crate::service::EntryService;
use ashvault_common::models::{Entry, Location};
use ashvault_sms::templates::format_template_date;
use ashvault_sms::{SendRequest, TemplateVariables};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub template_key: String,
    pub recipient: String,
    pub success: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

/// Positional values as `var1..varN`.
pub(crate) fn slots(values: &[&str]) -> TemplateVariables {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (format!("var{}", i + 1), v.to_string()))
        .collect()
}

/// Deceased name for messages; falls back to the customer's name.
pub(crate) fn deceased_name(entry: &Entry) -> &str {
    if entry.deceased_person_name.is_empty() {
        &entry.customer_name
    } else {
        &entry.deceased_person_name
    }
}

impl EntryService {
    pub(crate) fn message_date(&self, at: DateTime<Utc>) -> String {
        format_template_date(at.with_timezone(&self.timezone).date_naive())
    }

    pub(crate) async fn notify(
        &self,
        template_key: &str,
        recipient: &str,
        variables: TemplateVariables,
        entry: &Entry,
        location: &Location,
        operator_id: &str,
    ) -> Notification {
        let mut notification = Notification {
            template_key: template_key.to_string(),
            recipient: recipient.to_string(),
            success: false,
            message_id: None,
            error: None,
        };

        let Some(dispatcher) = &self.dispatcher else {
            notification.error = Some("SMS sending is disabled".to_string());
            return notification;
        };

        let request = SendRequest {
            recipient: recipient.to_string(),
            template_key: template_key.to_string(),
            variables,
            entry_id: Some(entry.id.clone()),
            customer_id: Some(entry.customer_id.clone()),
            location_id: Some(location.id.clone()),
            operator_id: Some(operator_id.to_string()),
        };

        match dispatcher.send_template(&request).await {
            Ok(outcome) => {
                notification.success = outcome.success;
                notification.message_id = outcome.message_id;
                notification.error = outcome.error;
            }
            Err(e) => notification.error = Some(e.to_string()),
        }
        if !notification.success {
            warn!(
                entry = %entry.id,
                template = template_key,
                error = notification.error.as_deref().unwrap_or_default(),
                "Confirmation SMS not delivered"
            );
        }
        notification
    }
}
