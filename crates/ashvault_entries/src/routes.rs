// --- File: crates/ashvault_entries/src/routes.rs ---
use crate::handlers::{
    bulk_import_handler, dashboard_handler, dispatch_handler, dispose_handler,
    get_customer_handler, get_entry_handler, intake_handler, issue_otp_handler,
    list_customers_handler, list_entries_handler, locker_grid_handler, lookup_customer_handler,
    renew_handler, verify_otp_handler, EntriesState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes(state: Arc<EntriesState>) -> Router {
    Router::new()
        .route("/customers", get(list_customers_handler))
        .route("/customers/lookup", get(lookup_customer_handler))
        .route("/customers/{id}", get(get_customer_handler))
        .route("/entries", post(intake_handler).get(list_entries_handler))
        .route("/entries/bulk-import", post(bulk_import_handler))
        .route("/entries/{id}", get(get_entry_handler))
        .route("/entries/{id}/renew", post(renew_handler))
        .route("/entries/{id}/dispatch", post(dispatch_handler))
        .route("/entries/{id}/dispose", post(dispose_handler))
        .route("/lockers/{location_id}", get(locker_grid_handler))
        .route("/dashboard/stats", get(dashboard_handler))
        .route("/otp/issue", post(issue_otp_handler))
        .route("/otp/verify", post(verify_otp_handler))
        .with_state(state)
}
