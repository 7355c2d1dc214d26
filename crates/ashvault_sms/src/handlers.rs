// --- File: crates/ashvault_sms/src/handlers.rs ---
use crate::dispatch::{SendOutcome, SendRequest, SmsDispatcher};
use crate::error::SmsError;
use crate::templates::{
    all_templates, format_variables_for_api, get_template_by_key, get_templates_by_category,
    SmsTemplate, TemplateCategory, TemplateVariables,
};
use crate::validation::{validate_template_variables, ValidationResult};
use ashvault_common::models::{SmsFunctionCall, SmsLog, SmsStatus};
use ashvault_common::{
    external_service_error, not_found, permission_denied, AshvaultError, Caller,
};
use ashvault_config::AppConfig;
use ashvault_store::repositories::{SmsLogFilter, SmsStatistics};
use ashvault_store::Repositories;
use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

const DEFAULT_LOG_LIMIT: u32 = 100;
const DEFAULT_LOG_RETENTION_DAYS: i64 = 90;

#[derive(Clone)]
pub struct SmsState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub dispatcher: Option<Arc<SmsDispatcher>>,
}

impl SmsState {
    fn dispatcher(&self) -> Result<&Arc<SmsDispatcher>, SmsError> {
        self.dispatcher.as_ref().ok_or(SmsError::Disabled)
    }
}

// --- Request / response types ---

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest {
    pub recipient: String,
    pub template_key: String,
    #[serde(default)]
    pub variables: TemplateVariables,
    pub entry_id: Option<String>,
    pub customer_id: Option<String>,
    pub location_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariablesRequest {
    pub template_key: String,
    #[serde(default)]
    pub variables: TemplateVariables,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatResponse {
    pub template_key: String,
    pub template_id: String,
    pub formatted: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub sms_enabled: bool,
    pub template_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatesQuery {
    pub category: Option<TemplateCategory>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub location_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsQuery {
    pub status: Option<SmsStatus>,
    pub template_key: Option<String>,
    pub location_id: Option<String>,
    pub entry_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLogsQuery {
    pub older_than_days: Option<i64>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteLogsResponse {
    pub deleted: u32,
    pub older_than_days: i64,
}

// --- Handlers ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/sms/health",
    responses((status = 200, description = "SMS service health", body = HealthResponse)),
    tag = "SMS"
))]
pub async fn health_handler(State(state): State<Arc<SmsState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "ashvault-sms".to_string(),
        sms_enabled: state.dispatcher.is_some(),
        template_count: all_templates().len(),
        timestamp: Utc::now(),
    })
}

/// Send one template message on behalf of the caller.
///
/// Operators must name a location they are assigned to.
/// An entry or customer named in a send must sit at the sending location.
fn require_linked_location(
    caller: &Caller,
    requested: Option<&str>,
    linked: &str,
) -> Result<(), AshvaultError> {
    caller.require_location(linked)?;
    match requested {
        Some(location_id) if location_id != linked => Err(AshvaultError::ValidationError(format!(
            "record belongs to location {}, not {}",
            linked, location_id
        ))),
        _ => Ok(()),
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/sms/send",
    request_body = SendSmsRequest,
    responses(
        (status = 200, description = "Message accepted by the gateway", body = SendOutcome),
        (status = 400, description = "Variable validation failed"),
        (status = 403, description = "Caller may not send for this location"),
        (status = 404, description = "Linked entry or customer not found"),
        (status = 502, description = "Gateway failed on every attempt"),
        (status = 503, description = "SMS disabled by configuration")
    ),
    tag = "SMS"
))]
pub async fn send_sms_handler(
    State(state): State<Arc<SmsState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<SendSmsRequest>,
) -> Result<Json<SendOutcome>, AshvaultError> {
    match request.location_id.as_deref() {
        Some(location_id) => caller.require_location(location_id)?,
        None if !caller.is_admin() => {
            return Err(permission_denied("operators must send for a location"))
        }
        None => {}
    }
    if let Some(entry_id) = &request.entry_id {
        let entry = state
            .repos
            .entries
            .get(entry_id)
            .await?
            .ok_or_else(|| not_found(format!("Entry {}", entry_id)))?;
        require_linked_location(&caller, request.location_id.as_deref(), &entry.location_id)?;
    }
    if let Some(customer_id) = &request.customer_id {
        let customer = state
            .repos
            .customers
            .get(customer_id)
            .await?
            .ok_or_else(|| not_found(format!("Customer {}", customer_id)))?;
        require_linked_location(&caller, request.location_id.as_deref(), &customer.location_id)?;
    }

    let dispatcher = state.dispatcher()?;
    let send = SendRequest {
        recipient: request.recipient.clone(),
        template_key: request.template_key.clone(),
        variables: request.variables,
        entry_id: request.entry_id,
        customer_id: request.customer_id,
        location_id: request.location_id,
        operator_id: Some(caller.id().to_string()),
    };

    let result = dispatcher.send_template(&send).await;

    let call = SmsFunctionCall {
        id: String::new(),
        caller_id: caller.id().to_string(),
        template_key: request.template_key.clone(),
        recipient: request.recipient,
        success: matches!(&result, Ok(outcome) if outcome.success),
        error: match &result {
            Ok(outcome) => outcome.error.clone(),
            Err(e) => Some(e.to_string()),
        },
        message_id: result.as_ref().ok().and_then(|o| o.message_id.clone()),
        timestamp: Utc::now(),
    };
    if let Err(e) = state.repos.function_calls.append(&call).await {
        error!(error = %e, "Failed to record SMS function call");
    }

    let outcome = result?;
    if outcome.success {
        info!(caller = %caller.id(), template = %request.template_key, "sendSMS succeeded");
        Ok(Json(outcome))
    } else {
        Err(external_service_error(
            "SMS gateway",
            format!(
                "delivery failed after {} attempts: {}",
                outcome.attempts,
                outcome.error.unwrap_or_default()
            ),
        ))
    }
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/sms/templates",
    params(TemplatesQuery),
    responses((status = 200, description = "Registered templates", body = [SmsTemplate])),
    tag = "SMS"
))]
pub async fn list_templates_handler(
    Query(query): Query<TemplatesQuery>,
) -> Json<Vec<SmsTemplate>> {
    let templates = match query.category {
        Some(category) => get_templates_by_category(category)
            .into_iter()
            .cloned()
            .collect(),
        None => all_templates().to_vec(),
    };
    Json(templates)
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/sms/templates/validate",
    request_body = TemplateVariablesRequest,
    responses((status = 200, description = "Validation findings", body = ValidationResult)),
    tag = "SMS"
))]
pub async fn validate_handler(
    Json(request): Json<TemplateVariablesRequest>,
) -> Json<ValidationResult> {
    Json(validate_template_variables(
        &request.template_key,
        &request.variables,
    ))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/sms/templates/format",
    request_body = TemplateVariablesRequest,
    responses(
        (status = 200, description = "Gateway variables string", body = FormatResponse),
        (status = 400, description = "A required variable is missing"),
        (status = 404, description = "Unknown template")
    ),
    tag = "SMS"
))]
pub async fn format_handler(
    Json(request): Json<TemplateVariablesRequest>,
) -> Result<Json<FormatResponse>, AshvaultError> {
    let formatted = format_variables_for_api(&request.template_key, &request.variables)?;
    let template_id = get_template_by_key(&request.template_key)
        .map(|t| t.id.clone())
        .unwrap_or_default();
    Ok(Json(FormatResponse {
        template_key: request.template_key,
        template_id,
        formatted,
    }))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/sms/statistics",
    params(StatisticsQuery),
    responses((status = 200, description = "Attempt counts", body = SmsStatistics)),
    tag = "SMS"
))]
pub async fn statistics_handler(
    State(state): State<Arc<SmsState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<StatisticsQuery>,
) -> Result<Json<SmsStatistics>, AshvaultError> {
    let filter = SmsLogFilter {
        location_ids: caller.scope_locations(query.location_id)?,
        from: query.from,
        to: query.to,
        ..Default::default()
    };
    let stats = state.repos.sms_logs.statistics(&filter).await?;
    Ok(Json(stats))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/sms/logs",
    params(LogsQuery),
    responses((status = 200, description = "Audit log, newest first", body = [SmsLog])),
    tag = "SMS"
))]
pub async fn list_logs_handler(
    State(state): State<Arc<SmsState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<LogsQuery>,
) -> Result<Json<Vec<SmsLog>>, AshvaultError> {
    let filter = SmsLogFilter {
        status: query.status,
        template_key: query.template_key,
        location_ids: caller.scope_locations(query.location_id)?,
        entry_id: query.entry_id,
        from: query.from,
        to: query.to,
        limit: Some(query.limit.unwrap_or(DEFAULT_LOG_LIMIT)),
    };
    let logs = state.repos.sms_logs.list(&filter).await?;
    Ok(Json(logs))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/sms/logs",
    params(DeleteLogsQuery),
    responses(
        (status = 200, description = "Old logs purged", body = DeleteLogsResponse),
        (status = 403, description = "Admin only")
    ),
    tag = "SMS"
))]
pub async fn delete_old_logs_handler(
    State(state): State<Arc<SmsState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<DeleteLogsQuery>,
) -> Result<Json<DeleteLogsResponse>, AshvaultError> {
    caller.require_admin()?;
    let older_than_days = query
        .older_than_days
        .unwrap_or(DEFAULT_LOG_RETENTION_DAYS)
        .max(0);
    let deleted = state.repos.sms_logs.delete_older_than(older_than_days).await?;
    info!(admin = %caller.id(), deleted, older_than_days, "Purged SMS logs");
    Ok(Json(DeleteLogsResponse {
        deleted,
        older_than_days,
    }))
}
