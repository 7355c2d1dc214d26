//! OAuth2 access tokens for the Firestore REST API.
//!
//! Reads a service account key with `yup-oauth2` and keeps the last token for
//! [`TOKEN_TTL`], well inside Google's one-hour lifetime.

use crate::error::StoreError;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::debug;
use yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator};

pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const TOKEN_TTL: Duration = Duration::from_secs(50 * 60);

pub struct TokenProvider {
    key_path: PathBuf,
    cached: Mutex<Option<(String, Instant)>>,
}

impl TokenProvider {
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
            cached: Mutex::new(None),
        }
    }

    pub async fn token(&self) -> Result<String, StoreError> {
        let mut cached = self.cached.lock().await;
        if let Some((token, fetched_at)) = cached.as_ref() {
            if fetched_at.elapsed() < TOKEN_TTL {
                return Ok(token.clone());
            }
        }

        debug!("Fetching Firestore access token");
        let token = fetch_token(&self.key_path).await?;
        *cached = Some((token.clone(), Instant::now()));
        Ok(token)
    }
}

async fn fetch_token(key_path: &Path) -> Result<String, StoreError> {
    let sa_key = read_service_account_key(key_path)
        .await
        .map_err(|e| StoreError::Auth(format!("reading {}: {}", key_path.display(), e)))?;

    let auth = ServiceAccountAuthenticator::builder(sa_key)
        .build()
        .await
        .map_err(|e| StoreError::Auth(e.to_string()))?;

    let access_token = auth
        .token(&[DATASTORE_SCOPE])
        .await
        .map_err(|e| StoreError::Auth(e.to_string()))?;

    access_token
        .token()
        .map(str::to_string)
        .ok_or_else(|| StoreError::Auth("No token available".to_string()))
}
