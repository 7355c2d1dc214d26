// --- File: crates/ashvault_reminders/src/handlers.rs ---
use crate::error::ReminderError;
use crate::job::ReminderJob;
use ashvault_common::models::{DailyExpiryCheck, RunTrigger, SmsSystemStats};
use ashvault_common::{AshvaultError, Caller};
use ashvault_store::Repositories;
use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const DEFAULT_RUNS_LIMIT: u32 = 30;

#[derive(Clone)]
pub struct ReminderState {
    pub repos: Repositories,
    pub job: Option<Arc<ReminderJob>>,
}

impl ReminderState {
    fn job(&self) -> Result<&Arc<ReminderJob>, ReminderError> {
        self.job.as_ref().ok_or(ReminderError::Disabled)
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct RunsQuery {
    pub limit: Option<u32>,
}

async fn trigger(
    state: &ReminderState,
    caller: &Caller,
    trigger: RunTrigger,
) -> Result<Json<DailyExpiryCheck>, AshvaultError> {
    caller.require_admin()?;
    let job = state.job()?;
    info!(admin = %caller.id(), ?trigger, "Expiry check triggered by hand");
    let run = job.run(trigger).await?;
    Ok(Json(run))
}

/// Run the expiry check now.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/reminders/run",
    responses(
        (status = 200, description = "Run summary", body = DailyExpiryCheck),
        (status = 403, description = "Admin only"),
        (status = 503, description = "SMS disabled")
    ),
    tag = "Reminders"
))]
pub async fn run_now_handler(
    State(state): State<Arc<ReminderState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<DailyExpiryCheck>, AshvaultError> {
    trigger(&state, &caller, RunTrigger::Manual).await
}

/// Re-run the whole expiry check. Entries already reminded today are sent again.
#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/sms/retry-failed",
    responses(
        (status = 200, description = "Run summary", body = DailyExpiryCheck),
        (status = 403, description = "Admin only"),
        (status = 503, description = "SMS disabled")
    ),
    tag = "Reminders"
))]
pub async fn retry_failed_handler(
    State(state): State<Arc<ReminderState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<DailyExpiryCheck>, AshvaultError> {
    trigger(&state, &caller, RunTrigger::Retry).await
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/reminders/runs",
    params(RunsQuery),
    responses((status = 200, description = "Recent runs, newest first", body = [DailyExpiryCheck])),
    tag = "Reminders"
))]
pub async fn list_runs_handler(
    State(state): State<Arc<ReminderState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<RunsQuery>,
) -> Result<Json<Vec<DailyExpiryCheck>>, AshvaultError> {
    caller.require_admin()?;
    let runs = state
        .repos
        .reminder_runs
        .list_recent(query.limit.unwrap_or(DEFAULT_RUNS_LIMIT))
        .await?;
    Ok(Json(runs))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/reminders/status",
    responses((status = 200, description = "Outcome of the last run", body = SmsSystemStats)),
    tag = "Reminders"
))]
pub async fn status_handler(
    State(state): State<Arc<ReminderState>>,
) -> Result<Json<SmsSystemStats>, AshvaultError> {
    Ok(Json(state.repos.system_stats.get_sms().await?))
}
