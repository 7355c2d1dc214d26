// --- File: crates/ashvault_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::error::{AshvaultError, HttpStatusCode};

pub mod client;

/// Extension trait for AshvaultError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for AshvaultError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Internal detail stays in the logs; the client only sees "internal".
        let error_message = if self.is_internal() {
            error!(error = %self, "request failed with internal error");
            "internal".to_string()
        } else {
            self.to_string()
        };

        let mut error_body = json!({
            "message": error_message,
            "code": status_code.as_u16(),
        });
        if let AshvaultError::ValidationErrors(errors) = &self {
            error_body["errors"] = json!(errors);
        }

        (status_code, Json(json!({ "error": error_body }))).into_response()
    }
}

impl IntoResponse for AshvaultError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_internal_errors_are_opaque() {
        let response = AshvaultError::DatabaseError("connection reset by peer".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "internal");
        assert_eq!(body["error"]["code"], 500);
    }

    #[tokio::test]
    async fn test_validation_errors_carry_list() {
        let response = AshvaultError::ValidationErrors(vec![
            "Missing required variable: var3".to_string(),
        ])
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["errors"][0], "Missing required variable: var3");
    }

    #[tokio::test]
    async fn test_permission_denied_keeps_message() {
        let response = AshvaultError::PermissionDenied("not assigned to location".into()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(
            body["error"]["message"],
            "Permission denied: not assigned to location"
        );
    }
}
