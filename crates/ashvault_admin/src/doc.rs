// File: crates/ashvault_admin/src/doc.rs
#![cfg(feature = "openapi")]

use crate::locations::{CreateLocationRequest, UpdateLocationRequest};
use crate::users::{ApproveUserRequest, RejectUserRequest, SignUpRequest};
use ashvault_common::models::{Location, User, UserRole};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_locations_handler,
        crate::handlers::get_location_handler,
        crate::handlers::create_location_handler,
        crate::handlers::update_location_handler,
        crate::handlers::delete_location_handler,
        crate::handlers::sign_up_handler,
        crate::handlers::me_handler,
        crate::handlers::list_users_handler,
        crate::handlers::list_pending_handler,
        crate::handlers::get_user_handler,
        crate::handlers::approve_user_handler,
        crate::handlers::reject_user_handler,
        crate::handlers::deactivate_user_handler,
        crate::handlers::reactivate_user_handler,
    ),
    components(
        schemas(
            Location,
            User,
            UserRole,
            CreateLocationRequest,
            UpdateLocationRequest,
            SignUpRequest,
            ApproveUserRequest,
            RejectUserRequest,
        )
    ),
    tags(
        (name = "Locations", description = "Venues and their lockers"),
        (name = "Users", description = "Operator sign-up and approval")
    )
)]
pub struct AdminApiDoc;
