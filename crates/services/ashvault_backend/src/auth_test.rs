#[cfg(test)]
mod tests {
    use crate::app::build_router;
    use crate::app_state::AppState;
    use crate::auth::AuthState;
    use ashvault_common::models::UserRole;
    use ashvault_common::testing::user;
    use ashvault_common::AshvaultError;
    use ashvault_config::{AppConfig, AuthConfig};
    use ashvault_store::{MemoryStore, Repositories};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn users() -> ashvault_store::repositories::UserRepository {
        Repositories::new(Arc::new(MemoryStore::new())).users
    }

    fn config_with(secret: Option<&str>, allow_missing_secret: bool) -> AppConfig {
        AppConfig {
            auth: AuthConfig {
                shared_secret: secret.map(str::to_string),
                allow_missing_secret,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_secret_is_taken_from_config() {
        let auth = AuthState::from_config(&config_with(Some("s3cret"), false), users()).unwrap();
        assert_eq!(auth.shared_secret.as_deref(), Some("s3cret"));
    }

    #[test]
    fn test_missing_secret_refuses_to_start() {
        for secret in [None, Some(""), Some("secret_from_env")] {
            let result = AuthState::from_config(&config_with(secret, false), users());
            assert!(
                matches!(result, Err(AshvaultError::ConfigError(_))),
                "{:?}",
                secret
            );
        }
        let state = AppState::new(
            Arc::new(config_with(None, false)),
            Arc::new(MemoryStore::new()),
        );
        assert!(state.is_err());
    }

    #[test]
    fn test_explicit_opt_out_turns_the_check_off() {
        for secret in [None, Some(""), Some("secret_from_env")] {
            let auth = AuthState::from_config(&config_with(secret, true), users()).unwrap();
            assert!(auth.shared_secret.is_none(), "{:?}", secret);
        }
    }

    #[test]
    fn test_configured_secret_wins_over_opt_out() {
        let auth = AuthState::from_config(&config_with(Some("s3cret"), true), users()).unwrap();
        assert_eq!(auth.shared_secret.as_deref(), Some("s3cret"));
    }

    #[tokio::test]
    async fn test_opted_out_router_accepts_requests_without_key() {
        let state = AppState::new(
            Arc::new(config_with(None, true)),
            Arc::new(MemoryStore::new()),
        )
        .unwrap();
        state
            .repos
            .users
            .create(user("op1", UserRole::Operator, &["l1"]))
            .await
            .unwrap();
        let app = build_router(&state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/users/me")
                    .header("x-user-id", "op1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
