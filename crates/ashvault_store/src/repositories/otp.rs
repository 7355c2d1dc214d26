use super::{decode, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use ashvault_common::models::{collections::OTP_VERIFICATIONS, OtpVerification};
use serde_json::Value;
use std::sync::Arc;

#[derive(Clone)]
pub struct OtpRepository {
    store: Arc<dyn DocumentStore>,
}

impl OtpRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, mut otp: OtpVerification) -> Result<OtpVerification, StoreError> {
        otp.id = self
            .store
            .create(OTP_VERIFICATIONS, None, encode(&otp)?)
            .await?;
        Ok(otp)
    }

    pub async fn get(&self, id: &str) -> Result<Option<OtpVerification>, StoreError> {
        self.store
            .get(OTP_VERIFICATIONS, id)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn update(&self, id: &str, fields: Value) -> Result<(), StoreError> {
        self.store.update(OTP_VERIFICATIONS, id, fields).await
    }
}
