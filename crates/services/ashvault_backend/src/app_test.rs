#[cfg(test)]
mod tests {
    use crate::app::build_router;
    use crate::app_state::AppState;
    use ashvault_common::models::UserRole;
    use ashvault_common::testing::user;
    use ashvault_config::{AppConfig, AuthConfig};
    use ashvault_store::MemoryStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "s3cret";

    async fn setup() -> (AppState, Router) {
        let config = AppConfig {
            auth: AuthConfig {
                shared_secret: Some(SECRET.into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let state = AppState::new(Arc::new(config), Arc::new(MemoryStore::new())).unwrap();

        state
            .repos
            .users
            .create(user("op1", UserRole::Operator, &["l1"]))
            .await
            .unwrap();
        let mut dormant = user("op2", UserRole::Operator, &["l1"]);
        dormant.is_active = false;
        state.repos.users.create(dormant).await.unwrap();

        let router = build_router(&state);
        (state, router)
    }

    async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = app
            .clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_health_needs_no_credentials() {
        let (_, app) = setup().await;
        let (status, body) = get(&app, "/api/sms/health", &[]).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["smsEnabled"], false);
    }

    #[tokio::test]
    async fn test_api_key_is_required() {
        let (_, app) = setup().await;

        let (status, body) = get(&app, "/api/users/me", &[("x-user-id", "op1")]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], 401);

        let (status, _) = get(
            &app,
            "/api/users/me",
            &[("x-api-key", "wrong"), ("x-user-id", "op1")],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_caller_must_be_a_known_active_user() {
        let (_, app) = setup().await;

        let (status, _) = get(&app, "/api/users/me", &[("x-api-key", SECRET)]).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(
            &app,
            "/api/users/me",
            &[("x-api-key", SECRET), ("x-user-id", "ghost")],
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = get(
            &app,
            "/api/users/me",
            &[("x-api-key", SECRET), ("x-user-id", "op2")],
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, me) = get(
            &app,
            "/api/users/me",
            &[("x-api-key", SECRET), ("x-user-id", "op1")],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["id"], "op1");
    }

    #[tokio::test]
    async fn test_operators_reach_feature_routes_but_not_admin_ones() {
        let (_, app) = setup().await;
        let op = [("x-api-key", SECRET), ("x-user-id", "op1")];

        let (status, _) = get(&app, "/api/sms/templates", &op).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get(&app, "/api/reminders/runs", &op).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, entries) = get(&app, "/api/entries", &op).await;
        assert_eq!(status, StatusCode::OK);
        assert!(entries.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sign_up_needs_only_the_api_key() {
        let (state, app) = setup().await;
        let body = json!({ "uid": "u9", "email": "kiran@example.com", "name": "Kiran" });
        let request = |key: Option<&str>| {
            let mut builder = Request::builder()
                .method("POST")
                .uri("/api/users/signup")
                .header("content-type", "application/json");
            if let Some(key) = key {
                builder = builder.header("x-api-key", key);
            }
            builder.body(Body::from(body.to_string())).unwrap()
        };

        let response = app.clone().oneshot(request(None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app.oneshot(request(Some(SECRET))).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = state.repos.users.get("u9").await.unwrap().unwrap();
        assert!(!stored.is_active);
    }
}
