// File: services/ashvault_backend/src/app.rs
use crate::app_state::AppState;
use crate::auth::{api_key_middleware, caller_middleware};
use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Assembles every router under `/api`.
///
/// - public: welcome text and `/sms/health`
/// - API key only: `/users/signup`
/// - API key and an active user: everything else
pub fn build_router(state: &AppState) -> Router {
    let public = Router::new()
        .route("/", get(|| async { "Welcome to the Ashvault API!" }))
        .merge(ashvault_sms::routes::public_routes(state.sms.clone()));

    let signup = ashvault_admin::routes::signup_routes(state.admin.clone());

    let protected = Router::new()
        .merge(ashvault_sms::routes::routes(state.sms.clone()))
        .merge(ashvault_reminders::routes::routes(state.reminders.clone()))
        .merge(ashvault_entries::routes::routes(state.entries.clone()))
        .merge(ashvault_admin::routes::routes(state.admin.clone()))
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            caller_middleware,
        ));

    let keyed = signup.merge(protected).layer(middleware::from_fn_with_state(
        state.auth.clone(),
        api_key_middleware,
    ));

    #[allow(unused_mut)] // for the features it needs to be mutable
    let mut app = Router::new().nest("/api", public.merge(keyed));

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui());
    }

    app.layer(TraceLayer::new_for_http()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}

#[cfg(feature = "openapi")]
fn swagger_ui() -> utoipa_swagger_ui::SwaggerUi {
    use ashvault_admin::doc::AdminApiDoc;
    use ashvault_entries::doc::EntriesApiDoc;
    use ashvault_reminders::doc::RemindersApiDoc;
    use ashvault_sms::doc::SmsApiDoc;
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Ashvault API",
            version = "0.1.0",
            description = "Storage, renewal and hand-back of cremation ashes"
        ),
        components(),
        tags((name = "Ashvault", description = "Core service endpoints")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(SmsApiDoc::openapi());
    openapi_doc.merge(RemindersApiDoc::openapi());
    openapi_doc.merge(EntriesApiDoc::openapi());
    openapi_doc.merge(AdminApiDoc::openapi());
    tracing::info!("Adding Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc)
}
