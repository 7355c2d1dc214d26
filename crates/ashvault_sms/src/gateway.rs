//! The SMS gateway seam and its Fast2SMS implementation.
//!
//! One call is one HTTP GET:
//!
//! ```text
//! <base_url>?authorization=<key>&sender_id=<id>&message=<template id>
//!           &variables_values=<a|b|c>&route=dlt&numbers=<10-digit number>
//! ```
//!
//! The JSON answer carries `return: true` and a `request_id` on success.

use crate::error::GatewayError;
use ashvault_common::{create_client, BoxFuture};
use ashvault_config::SmsConfig;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Sends one pre-formatted DLT template message. No retries here.
pub trait SmsGateway: Send + Sync {
    /// Returns the gateway's message (request) id.
    fn send<'a>(
        &'a self,
        recipient: &'a str,
        template_id: &'a str,
        variables_values: &'a str,
    ) -> BoxFuture<'a, String, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct GatewayResponse {
    #[serde(rename = "return", default)]
    success: bool,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    message: Option<Value>,
}

impl GatewayResponse {
    fn message_text(&self) -> String {
        match &self.message {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect::<Vec<_>>()
                .join(", "),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        }
    }
}

pub struct Fast2SmsGateway {
    client: Client,
    base_url: String,
    api_key: String,
    sender_id: String,
    route: String,
}

impl Fast2SmsGateway {
    pub fn new(client: Client, config: &SmsConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            sender_id: config.sender_id.clone(),
            route: config.route.clone(),
        }
    }

    pub fn from_config(config: &SmsConfig) -> Result<Self, GatewayError> {
        let client = create_client(config.timeout_secs, true)
            .map_err(|e| GatewayError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(client, config))
    }

    async fn send_impl(
        &self,
        recipient: &str,
        template_id: &str,
        variables_values: &str,
    ) -> Result<String, GatewayError> {
        debug!(recipient, template_id, "Calling SMS gateway");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("authorization", self.api_key.as_str()),
                ("sender_id", self.sender_id.as_str()),
                ("message", template_id),
                ("variables_values", variables_values),
                ("route", self.route.as_str()),
                ("numbers", recipient),
            ])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        match status {
            StatusCode::UNAUTHORIZED => {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::Authentication(body));
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let body = response.text().await.unwrap_or_default();
                return Err(GatewayError::RateLimit(body));
            }
            s if !s.is_success() => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = s.as_u16(), body = %body, "SMS gateway returned error status");
                return Err(GatewayError::Api(format!("HTTP {}: {}", s.as_u16(), body)));
            }
            _ => {}
        }

        let parsed: GatewayResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Api(format!("unreadable gateway response: {}", e)))?;

        if !parsed.success {
            return Err(GatewayError::Api(parsed.message_text()));
        }

        parsed
            .request_id
            .ok_or_else(|| GatewayError::Api("gateway response without request_id".to_string()))
    }
}

/// Connection refused and DNS failures are network errors; timeouts and the
/// rest count as API errors.
fn classify_transport_error(err: reqwest::Error) -> GatewayError {
    if err.is_connect() {
        GatewayError::Network(err.to_string())
    } else {
        GatewayError::Api(err.to_string())
    }
}

impl SmsGateway for Fast2SmsGateway {
    fn send<'a>(
        &'a self,
        recipient: &'a str,
        template_id: &'a str,
        variables_values: &'a str,
    ) -> BoxFuture<'a, String, GatewayError> {
        Box::pin(self.send_impl(recipient, template_id, variables_values))
    }
}
