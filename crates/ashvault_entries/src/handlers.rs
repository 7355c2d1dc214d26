// --- File: crates/ashvault_entries/src/handlers.rs ---
use crate::bulk_import::{BulkImportReport, BulkImportRequest};
use crate::otp::{IssueOtpRequest, IssuedOtp, VerifiedOtp, VerifyOtpRequest};
use crate::service::EntryService;
use crate::views::{DashboardStats, LockerGrid};
use crate::workflows::{DispatchRequest, DisposeRequest, IntakeRequest, RenewRequest, WorkflowResult};
use ashvault_common::models::{Customer, Entry, EntryStatus};
use ashvault_common::{not_found, AshvaultError, Caller};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct EntriesState {
    pub service: Arc<EntryService>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationQuery {
    pub location_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntriesQuery {
    pub location_id: Option<String>,
    pub status: Option<EntryStatus>,
    pub customer_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct MobileQuery {
    pub mobile: String,
}

// --- Customers ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/customers",
    params(LocationQuery),
    responses((status = 200, description = "Customers", body = [Customer])),
    tag = "Customers"
))]
pub async fn list_customers_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<Vec<Customer>>, AshvaultError> {
    Ok(Json(state.service.list_customers(&caller, query.location_id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/customers/lookup",
    params(MobileQuery),
    responses(
        (status = 200, description = "Customer with this mobile", body = Customer),
        (status = 404, description = "No such customer")
    ),
    tag = "Customers"
))]
pub async fn lookup_customer_handler(
    State(state): State<Arc<EntriesState>>,
    Query(query): Query<MobileQuery>,
) -> Result<Json<Customer>, AshvaultError> {
    state
        .service
        .find_customer_by_mobile(&query.mobile)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(format!("no customer with mobile {}", query.mobile)))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = String, Path, description = "Customer id")),
    responses((status = 200, description = "Customer", body = Customer)),
    tag = "Customers"
))]
pub async fn get_customer_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<Customer>, AshvaultError> {
    Ok(Json(state.service.get_customer(&caller, &id).await?))
}

// --- Entries ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/entries",
    request_body = IntakeRequest,
    responses(
        (status = 201, description = "Entry created", body = Entry),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Location not assigned")
    ),
    tag = "Entries"
))]
pub async fn intake_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<IntakeRequest>,
) -> Result<(StatusCode, Json<Entry>), AshvaultError> {
    let entry = state.service.intake(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/entries",
    params(EntriesQuery),
    responses((status = 200, description = "Entries, newest first", body = [Entry])),
    tag = "Entries"
))]
pub async fn list_entries_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<Vec<Entry>>, AshvaultError> {
    let entries = state
        .service
        .list_entries(&caller, query.location_id, query.status, query.customer_id)
        .await?;
    Ok(Json(entries))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/entries/{id}",
    params(("id" = String, Path, description = "Entry id")),
    responses((status = 200, description = "Entry", body = Entry)),
    tag = "Entries"
))]
pub async fn get_entry_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<Entry>, AshvaultError> {
    Ok(Json(state.service.get_entry(&caller, &id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/entries/{id}/renew",
    params(("id" = String, Path, description = "Entry id")),
    request_body = RenewRequest,
    responses((status = 200, description = "Renewed entry and confirmations", body = WorkflowResult)),
    tag = "Entries"
))]
pub async fn renew_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<RenewRequest>,
) -> Result<Json<WorkflowResult>, AshvaultError> {
    Ok(Json(state.service.renew(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/entries/{id}/dispatch",
    params(("id" = String, Path, description = "Entry id")),
    request_body = DispatchRequest,
    responses((status = 200, description = "Updated entry and confirmations", body = WorkflowResult)),
    tag = "Entries"
))]
pub async fn dispatch_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<DispatchRequest>,
) -> Result<Json<WorkflowResult>, AshvaultError> {
    Ok(Json(state.service.dispatch(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/entries/{id}/dispose",
    params(("id" = String, Path, description = "Entry id")),
    request_body = DisposeRequest,
    responses((status = 200, description = "Disposed entry and notices", body = WorkflowResult)),
    tag = "Entries"
))]
pub async fn dispose_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<DisposeRequest>,
) -> Result<Json<WorkflowResult>, AshvaultError> {
    Ok(Json(state.service.dispose(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/entries/bulk-import",
    request_body = BulkImportRequest,
    responses((status = 200, description = "Per-row import report", body = BulkImportReport)),
    tag = "Entries"
))]
pub async fn bulk_import_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<BulkImportRequest>,
) -> Result<Json<BulkImportReport>, AshvaultError> {
    Ok(Json(state.service.bulk_import(&caller, request).await?))
}

// --- Views ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/lockers/{location_id}",
    params(("location_id" = String, Path, description = "Location id")),
    responses((status = 200, description = "Locker occupancy", body = LockerGrid)),
    tag = "Entries"
))]
pub async fn locker_grid_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Path(location_id): Path<String>,
) -> Result<Json<LockerGrid>, AshvaultError> {
    Ok(Json(state.service.locker_grid(&caller, &location_id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/dashboard/stats",
    params(LocationQuery),
    responses((status = 200, description = "Entry counts", body = DashboardStats)),
    tag = "Entries"
))]
pub async fn dashboard_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<LocationQuery>,
) -> Result<Json<DashboardStats>, AshvaultError> {
    Ok(Json(state.service.dashboard(&caller, query.location_id).await?))
}

// --- OTP ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/otp/issue",
    request_body = IssueOtpRequest,
    responses((status = 200, description = "Code to read to the customer", body = IssuedOtp)),
    tag = "OTP"
))]
pub async fn issue_otp_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<IssueOtpRequest>,
) -> Result<Json<IssuedOtp>, AshvaultError> {
    Ok(Json(state.service.issue_otp(&caller, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/otp/verify",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Code accepted", body = VerifiedOtp),
        (status = 400, description = "Wrong, expired or exhausted code")
    ),
    tag = "OTP"
))]
pub async fn verify_otp_handler(
    State(state): State<Arc<EntriesState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<VerifyOtpRequest>,
) -> Result<Json<VerifiedOtp>, AshvaultError> {
    Ok(Json(state.service.verify_otp(&caller, request).await?))
}
