//! Request authentication for the `/api` routes.
//!
//! Two checks, layered separately:
//! - the shared secret in `x-api-key`, compared in constant time;
//! - the signed-in user from `x-user-id`, which must exist and be active.
//!   The loaded user is put into the request extensions as a [`Caller`].

use ashvault_common::auth::{API_KEY_HEADER, USER_ID_HEADER};
use ashvault_common::{config_error, AshvaultError, Caller};
use ashvault_config::{env_vars::SECRET_MARKER, AppConfig};
use ashvault_store::repositories::UserRepository;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use constant_time_eq::constant_time_eq;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct AuthState {
    /// `None` only when `auth.allow_missing_secret` is set.
    pub shared_secret: Option<String>,
    pub users: UserRepository,
}

impl AuthState {
    /// Fails when no secret is configured, unless `auth.allow_missing_secret`
    /// explicitly opts out of the API key check.
    pub fn from_config(config: &AppConfig, users: UserRepository) -> Result<Self, AshvaultError> {
        let shared_secret = config
            .auth
            .shared_secret
            .clone()
            .filter(|s| !s.is_empty() && s != SECRET_MARKER);
        if shared_secret.is_none() {
            if !config.auth.allow_missing_secret {
                return Err(config_error(
                    "auth.shared_secret is not set; set ASHVAULT_SECRET_AUTH_SHARED_SECRET \
                     or auth.allow_missing_secret = true",
                ));
            }
            warn!("auth.allow_missing_secret is set; API key check is off");
        }
        Ok(Self {
            shared_secret,
            users,
        })
    }
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub async fn api_key_middleware(
    State(auth): State<Arc<AuthState>>,
    req: Request,
    next: Next,
) -> Result<Response, AshvaultError> {
    if let Some(expected) = &auth.shared_secret {
        let provided = header(&req, API_KEY_HEADER)
            .ok_or_else(|| AshvaultError::AuthError(format!("missing {} header", API_KEY_HEADER)))?;
        if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
            warn!(path = %req.uri().path(), "Rejected request with invalid API key");
            return Err(AshvaultError::AuthError("invalid API key".into()));
        }
    }
    Ok(next.run(req).await)
}

pub async fn caller_middleware(
    State(auth): State<Arc<AuthState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AshvaultError> {
    let user_id = header(&req, USER_ID_HEADER)
        .ok_or_else(|| AshvaultError::AuthError(format!("missing {} header", USER_ID_HEADER)))?
        .to_string();

    let user = auth
        .users
        .get(&user_id)
        .await?
        .ok_or_else(|| AshvaultError::AuthError(format!("unknown user {}", user_id)))?;
    if !user.is_active {
        warn!(user = %user_id, "Inactive user refused");
        return Err(AshvaultError::PermissionDenied(
            "account is not active".into(),
        ));
    }

    debug!(user = %user_id, role = ?user.role, "Caller authenticated");
    req.extensions_mut().insert(Caller::new(user));
    Ok(next.run(req).await)
}
