// --- File: crates/ashvault_admin/src/routes.rs ---
use crate::handlers::{
    approve_user_handler, create_location_handler, deactivate_user_handler,
    delete_location_handler, get_location_handler, get_user_handler, list_locations_handler,
    list_pending_handler, list_users_handler, me_handler, reactivate_user_handler,
    reject_user_handler, sign_up_handler, update_location_handler, AdminState,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Sign-up runs before the user exists, so it needs no signed-in caller.
pub fn signup_routes(state: Arc<AdminState>) -> Router {
    Router::new()
        .route("/users/signup", post(sign_up_handler))
        .with_state(state)
}

pub fn routes(state: Arc<AdminState>) -> Router {
    Router::new()
        .route(
            "/locations",
            get(list_locations_handler).post(create_location_handler),
        )
        .route(
            "/locations/{id}",
            get(get_location_handler)
                .put(update_location_handler)
                .delete(delete_location_handler),
        )
        .route("/users", get(list_users_handler))
        .route("/users/me", get(me_handler))
        .route("/users/pending", get(list_pending_handler))
        .route("/users/{id}", get(get_user_handler))
        .route("/users/{id}/approve", post(approve_user_handler))
        .route("/users/{id}/reject", post(reject_user_handler))
        .route("/users/{id}/deactivate", post(deactivate_user_handler))
        .route("/users/{id}/reactivate", post(reactivate_user_handler))
        .with_state(state)
}
