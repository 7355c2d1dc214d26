// --- File: crates/ashvault_reminders/src/routes.rs ---
use crate::handlers::{
    list_runs_handler, retry_failed_handler, run_now_handler, status_handler, ReminderState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(state: Arc<ReminderState>) -> Router {
    Router::new()
        .route("/reminders/run", post(run_now_handler))
        .route("/reminders/runs", get(list_runs_handler))
        .route("/reminders/status", get(status_handler))
        .route("/sms/retry-failed", post(retry_failed_handler))
        .with_state(state)
}
