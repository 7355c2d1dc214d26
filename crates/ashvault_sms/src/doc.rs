// File: crates/ashvault_sms/src/doc.rs
#![cfg(feature = "openapi")]

use crate::dispatch::SendOutcome;
use crate::handlers::{
    DeleteLogsResponse, FormatResponse, HealthResponse, SendSmsRequest, TemplateVariablesRequest,
};
use crate::templates::{SmsTemplate, TemplateCategory, TemplateVariable};
use crate::validation::ValidationResult;
use ashvault_common::models::{SmsLog, SmsStatus};
use ashvault_store::repositories::{SmsStatistics, TemplateStatistics};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health_handler,
        crate::handlers::send_sms_handler,
        crate::handlers::list_templates_handler,
        crate::handlers::validate_handler,
        crate::handlers::format_handler,
        crate::handlers::statistics_handler,
        crate::handlers::list_logs_handler,
        crate::handlers::delete_old_logs_handler,
    ),
    components(
        schemas(
            SendSmsRequest,
            SendOutcome,
            TemplateVariablesRequest,
            FormatResponse,
            HealthResponse,
            DeleteLogsResponse,
            SmsTemplate,
            TemplateVariable,
            TemplateCategory,
            ValidationResult,
            SmsLog,
            SmsStatus,
            SmsStatistics,
            TemplateStatistics,
        )
    ),
    tags(
        (name = "SMS", description = "DLT template messaging and audit log")
    )
)]
pub struct SmsApiDoc;
