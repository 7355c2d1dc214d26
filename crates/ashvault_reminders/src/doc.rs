// File: crates/ashvault_reminders/src/doc.rs
#![cfg(feature = "openapi")]

use ashvault_common::models::{DailyExpiryCheck, RunTrigger, SmsSystemStats};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::run_now_handler,
        crate::handlers::retry_failed_handler,
        crate::handlers::list_runs_handler,
        crate::handlers::status_handler,
    ),
    components(schemas(DailyExpiryCheck, RunTrigger, SmsSystemStats)),
    tags(
        (name = "Reminders", description = "Daily expiry reminder job")
    )
)]
pub struct RemindersApiDoc;
