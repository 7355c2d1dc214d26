use super::{decode_all, encode};
use crate::client::DocumentStore;
use crate::error::StoreError;
use crate::query::{Direction, FilterOp, Query};
use ashvault_common::models::{collections::SMS_LOGS, SmsLog, SmsStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct SmsLogFilter {
    pub status: Option<SmsStatus>,
    pub template_key: Option<String>,
    /// Logs for any of these locations.
    pub location_ids: Option<Vec<String>>,
    pub entry_id: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateStatistics {
    pub total: u32,
    pub sent: u32,
    pub failed: u32,
}

/// Counts over the audit log. Every attempt counts, so one message that
/// needed three attempts shows up three times.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmsStatistics {
    pub total: u32,
    pub sent: u32,
    pub failed: u32,
    pub pending: u32,
    /// Percentage of sent attempts, 0 when there are none.
    pub success_rate: f64,
    pub by_template: BTreeMap<String, TemplateStatistics>,
}

impl SmsStatistics {
    pub fn from_logs(logs: &[SmsLog]) -> Self {
        let mut stats = SmsStatistics::default();
        for log in logs {
            stats.total += 1;
            let per_template = stats.by_template.entry(log.template_key.clone()).or_default();
            per_template.total += 1;
            match log.status {
                SmsStatus::Sent => {
                    stats.sent += 1;
                    per_template.sent += 1;
                }
                SmsStatus::Failed => {
                    stats.failed += 1;
                    per_template.failed += 1;
                }
                SmsStatus::Pending => stats.pending += 1,
            }
        }
        if stats.total > 0 {
            stats.success_rate = f64::from(stats.sent) * 100.0 / f64::from(stats.total);
        }
        stats
    }
}

/// Append-only audit trail of gateway attempts.
#[derive(Clone)]
pub struct SmsLogRepository {
    store: Arc<dyn DocumentStore>,
}

impl SmsLogRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn append(&self, mut log: SmsLog) -> Result<SmsLog, StoreError> {
        log.id = self.store.create(SMS_LOGS, None, encode(&log)?).await?;
        Ok(log)
    }

    /// Newest first.
    pub async fn list(&self, filter: &SmsLogFilter) -> Result<Vec<SmsLog>, StoreError> {
        let mut query = Query::new();
        if let Some(status) = filter.status {
            query = query.eq("status", status.as_str());
        }
        if let Some(template_key) = &filter.template_key {
            query = query.eq("templateKey", template_key.as_str());
        }
        if let Some(location_ids) = &filter.location_ids {
            query = query.any_of("locationId", location_ids);
        }
        if let Some(entry_id) = &filter.entry_id {
            query = query.eq("entryId", entry_id.as_str());
        }
        if let Some(from) = filter.from {
            query = query.filter("timestamp", FilterOp::Ge, from.to_rfc3339());
        }
        if let Some(to) = filter.to {
            query = query.filter("timestamp", FilterOp::Le, to.to_rfc3339());
        }
        query = query.order_by("timestamp", Direction::Descending);
        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }
        decode_all(self.store.query(SMS_LOGS, query).await?)
    }

    /// Purge logs older than `days`; returns how many were deleted.
    pub async fn delete_older_than(&self, days: i64) -> Result<u32, StoreError> {
        let cutoff = Duration::try_days(days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| StoreError::OutOfRange(format!("retention of {} days is out of range", days)))?;
        let docs = self
            .store
            .query(
                SMS_LOGS,
                Query::new().filter("timestamp", FilterOp::Lt, cutoff.to_rfc3339()),
            )
            .await?;

        let mut deleted = 0;
        for doc in docs {
            if self.store.delete(SMS_LOGS, &doc.id).await? {
                deleted += 1;
            }
        }
        info!(deleted, days, "Deleted old SMS logs");
        Ok(deleted)
    }

    pub async fn statistics(&self, filter: &SmsLogFilter) -> Result<SmsStatistics, StoreError> {
        let logs = self.list(filter).await?;
        Ok(SmsStatistics::from_logs(&logs))
    }
}
