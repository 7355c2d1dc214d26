// --- File: crates/ashvault_sms/src/routes.rs ---

use crate::handlers::{
    delete_old_logs_handler, format_handler, health_handler, list_logs_handler,
    list_templates_handler, send_sms_handler, statistics_handler, validate_handler, SmsState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Routes reachable without a caller identity.
pub fn public_routes(state: Arc<SmsState>) -> Router {
    Router::new()
        .route("/sms/health", get(health_handler))
        .with_state(state)
}

/// Routes that expect a `Caller` extension set by the auth layer.
pub fn routes(state: Arc<SmsState>) -> Router {
    Router::new()
        .route("/sms/send", post(send_sms_handler))
        .route("/sms/templates", get(list_templates_handler))
        .route("/sms/templates/validate", post(validate_handler))
        .route("/sms/templates/format", post(format_handler))
        .route("/sms/statistics", get(statistics_handler))
        .route(
            "/sms/logs",
            get(list_logs_handler).delete(delete_old_logs_handler),
        )
        .with_state(state)
}
