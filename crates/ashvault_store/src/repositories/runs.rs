//! Bookkeeping collections: `smsFunctionCalls`, `dailyExpiryChecks` and the
//! `systemStats/sms` document.

use super::{decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, Query};
use ashvault_common::models::{
    collections::{DAILY_EXPIRY_CHECKS, SMS_FUNCTION_CALLS, SYSTEM_STATS},
    DailyExpiryCheck, SmsFunctionCall, SmsSystemStats,
};
use serde_json::Value;
use std::sync::Arc;

const SMS_STATS_DOC: &str = "sms";

#[derive(Clone)]
pub struct FunctionCallRepository {
    store: Arc<dyn DocumentStore>,
}

impl FunctionCallRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, call: &SmsFunctionCall) -> Result<String, StoreError> {
        self.store
            .create(SMS_FUNCTION_CALLS, None, encode(call)?)
            .await
    }
}

#[derive(Clone)]
pub struct ReminderRunRepository {
    store: Arc<dyn DocumentStore>,
}

impl ReminderRunRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, mut run: DailyExpiryCheck) -> Result<DailyExpiryCheck, StoreError> {
        run.id = self
            .store
            .create(DAILY_EXPIRY_CHECKS, None, encode(&run)?)
            .await?;
        Ok(run)
    }

    pub async fn list_recent(&self, limit: u32) -> Result<Vec<DailyExpiryCheck>, StoreError> {
        let docs = self
            .store
            .query(
                DAILY_EXPIRY_CHECKS,
                Query::new()
                    .order_by("runAt", Direction::Descending)
                    .limit(limit),
            )
            .await?;
        decode_all(docs)
    }
}

#[derive(Clone)]
pub struct SystemStatsRepository {
    store: Arc<dyn DocumentStore>,
}

impl SystemStatsRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn get_sms(&self) -> Result<SmsSystemStats, StoreError> {
        match self.store.get(SYSTEM_STATS, SMS_STATS_DOC).await? {
            Some(doc) => Ok(serde_json::from_value(doc.data)?),
            None => Ok(SmsSystemStats::default()),
        }
    }

    pub async fn set_sms(&self, stats: &SmsSystemStats) -> Result<(), StoreError> {
        let data: Value = encode(stats)?;
        self.store.set(SYSTEM_STATS, SMS_STATS_DOC, data).await
    }
}
