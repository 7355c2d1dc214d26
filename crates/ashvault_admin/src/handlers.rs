// --- File: crates/ashvault_admin/src/handlers.rs ---
use crate::locations::{CreateLocationRequest, UpdateLocationRequest};
use crate::service::AdminService;
use crate::users::{ApproveUserRequest, RejectUserRequest, SignUpRequest};
use ashvault_common::models::{Location, User};
use ashvault_common::{AshvaultError, Caller};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AdminState {
    pub service: Arc<AdminService>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationsQuery {
    #[serde(default)]
    pub active_only: bool,
}

// --- Locations ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/locations",
    params(LocationsQuery),
    responses((status = 200, description = "Locations visible to the caller", body = [Location])),
    tag = "Locations"
))]
pub async fn list_locations_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Query(query): Query<LocationsQuery>,
) -> Result<Json<Vec<Location>>, AshvaultError> {
    Ok(Json(state.service.list_locations(&caller, query.active_only).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location", body = Location),
        (status = 404, description = "No such location")
    ),
    tag = "Locations"
))]
pub async fn get_location_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<Location>, AshvaultError> {
    Ok(Json(state.service.get_location(&caller, &id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = Location),
        (status = 403, description = "Admin role required")
    ),
    tag = "Locations"
))]
pub async fn create_location_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<Location>), AshvaultError> {
    let location = state.service.create_location(&caller, request).await?;
    Ok((StatusCode::CREATED, Json(location)))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    put,
    path = "/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses((status = 200, description = "Updated location", body = Location)),
    tag = "Locations"
))]
pub async fn update_location_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<Location>, AshvaultError> {
    Ok(Json(state.service.update_location(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/locations/{id}",
    params(("id" = String, Path, description = "Location id")),
    responses(
        (status = 204, description = "Location deleted"),
        (status = 409, description = "Location still stores ashes")
    ),
    tag = "Locations"
))]
pub async fn delete_location_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<StatusCode, AshvaultError> {
    state.service.delete_location(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Users ---

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Sign-up stored, awaiting approval", body = User),
        (status = 409, description = "Email or uid already registered")
    ),
    tag = "Users"
))]
pub async fn sign_up_handler(
    State(state): State<Arc<AdminState>>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<User>), AshvaultError> {
    let user = state.service.sign_up(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/me",
    responses((status = 200, description = "The signed-in user", body = User)),
    tag = "Users"
))]
pub async fn me_handler(Extension(caller): Extension<Caller>) -> Json<User> {
    Json(caller.user)
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users",
    responses((status = 200, description = "All users", body = [User])),
    tag = "Users"
))]
pub async fn list_users_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<User>>, AshvaultError> {
    Ok(Json(state.service.list_users(&caller).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/pending",
    responses((status = 200, description = "Sign-ups awaiting a decision", body = [User])),
    tag = "Users"
))]
pub async fn list_pending_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<Vec<User>>, AshvaultError> {
    Ok(Json(state.service.list_pending_users(&caller).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/users/{id}",
    params(("id" = String, Path, description = "User uid")),
    responses((status = 200, description = "User", body = User)),
    tag = "Users"
))]
pub async fn get_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<User>, AshvaultError> {
    Ok(Json(state.service.get_user(&caller, &id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/{id}/approve",
    params(("id" = String, Path, description = "User uid")),
    request_body = ApproveUserRequest,
    responses((status = 200, description = "Approved user", body = User)),
    tag = "Users"
))]
pub async fn approve_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<ApproveUserRequest>,
) -> Result<Json<User>, AshvaultError> {
    Ok(Json(state.service.approve_user(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/{id}/reject",
    params(("id" = String, Path, description = "User uid")),
    request_body = RejectUserRequest,
    responses((status = 200, description = "Rejected user", body = User)),
    tag = "Users"
))]
pub async fn reject_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(request): Json<RejectUserRequest>,
) -> Result<Json<User>, AshvaultError> {
    Ok(Json(state.service.reject_user(&caller, &id, request).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/{id}/deactivate",
    params(("id" = String, Path, description = "User uid")),
    responses((status = 200, description = "Deactivated user", body = User)),
    tag = "Users"
))]
pub async fn deactivate_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<User>, AshvaultError> {
    Ok(Json(state.service.deactivate_user(&caller, &id).await?))
}

#[axum::debug_handler]
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/users/{id}/reactivate",
    params(("id" = String, Path, description = "User uid")),
    responses((status = 200, description = "Reactivated user", body = User)),
    tag = "Users"
))]
pub async fn reactivate_user_handler(
    State(state): State<Arc<AdminState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Result<Json<User>, AshvaultError> {
    Ok(Json(state.service.reactivate_user(&caller, &id).await?))
}
