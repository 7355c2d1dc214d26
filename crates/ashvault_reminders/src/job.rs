//! The daily expiry check.
//!
//! Every `active` entry whose expiry falls on today + `days_before` gets a
//! `threeDayReminder`; one expiring today gets a `lastdayRenewal`. Dates are
//! compared as calendar dates in the configured timezone. Entries are handled
//! one after another.

use crate::error::ReminderError;
use ashvault_common::models::{
    DailyExpiryCheck, Entry, EntryStatus, RunTrigger, SmsSystemStats,
};
use ashvault_config::ReminderConfig;
use ashvault_sms::templates::{format_template_date, LAST_DAY_RENEWAL, THREE_DAY_REMINDER};
use ashvault_sms::{SendRequest, SmsDispatcher, TemplateVariables};
use ashvault_store::Repositories;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Which reminder, if any, an expiry date calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderKind {
    ThreeDay,
    LastDay,
}

impl ReminderKind {
    pub fn template_key(self) -> &'static str {
        match self {
            ReminderKind::ThreeDay => THREE_DAY_REMINDER,
            ReminderKind::LastDay => LAST_DAY_RENEWAL,
        }
    }
}

/// Classify `expiry` against `today`, both as dates in `tz`.
pub fn classify_expiry(
    expiry: DateTime<Utc>,
    today: NaiveDate,
    days_before: i64,
    tz: Tz,
) -> Option<ReminderKind> {
    let expiry_date = expiry.with_timezone(&tz).date_naive();
    if expiry_date == today + Duration::days(days_before) {
        Some(ReminderKind::ThreeDay)
    } else if expiry_date == today {
        Some(ReminderKind::LastDay)
    } else {
        None
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz, ReminderError> {
    name.parse::<Tz>()
        .map_err(|_| ReminderError::Timezone(name.to_string()))
}

pub struct ReminderJob {
    repos: Repositories,
    dispatcher: Arc<SmsDispatcher>,
    timezone: Tz,
    days_before: i64,
}

impl ReminderJob {
    pub fn new(
        repos: Repositories,
        dispatcher: Arc<SmsDispatcher>,
        timezone: Tz,
        days_before: i64,
    ) -> Self {
        Self {
            repos,
            dispatcher,
            timezone,
            days_before,
        }
    }

    pub fn from_config(
        config: &ReminderConfig,
        repos: Repositories,
        dispatcher: Arc<SmsDispatcher>,
    ) -> Result<Self, ReminderError> {
        let timezone = parse_timezone(&config.timezone)?;
        Ok(Self::new(repos, dispatcher, timezone, config.days_before))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub async fn run(&self, trigger: RunTrigger) -> Result<DailyExpiryCheck, ReminderError> {
        self.run_at(Utc::now(), trigger).await
    }

    /// Run the check as if the clock read `now`.
    #[instrument(skip(self), fields(tz = %self.timezone))]
    pub async fn run_at(
        &self,
        now: DateTime<Utc>,
        trigger: RunTrigger,
    ) -> Result<DailyExpiryCheck, ReminderError> {
        let today = now.with_timezone(&self.timezone).date_naive();
        let entries = self.repos.entries.list_by_status(EntryStatus::Active).await?;
        info!(%today, entries = entries.len(), "Starting expiry check");

        let mut run = DailyExpiryCheck {
            id: String::new(),
            run_at: now,
            trigger,
            timezone: self.timezone.name().to_string(),
            run_date: today.format("%Y-%m-%d").to_string(),
            entries_checked: entries.len() as u32,
            three_day_matches: 0,
            last_day_matches: 0,
            sms_sent: 0,
            sms_failed: 0,
            errors: Vec::new(),
        };

        for entry in &entries {
            let Some(kind) =
                classify_expiry(entry.expiry_date, today, self.days_before, self.timezone)
            else {
                continue;
            };
            match kind {
                ReminderKind::ThreeDay => run.three_day_matches += 1,
                ReminderKind::LastDay => run.last_day_matches += 1,
            }

            match self.remind(entry, kind).await {
                Ok(()) => run.sms_sent += 1,
                Err(message) => {
                    warn!(entry = %entry.id, error = %message, "Reminder not delivered");
                    run.sms_failed += 1;
                    run.errors.push(message);
                }
            }
        }

        let run = self.repos.reminder_runs.append(run).await?;
        self.repos
            .system_stats
            .set_sms(&SmsSystemStats {
                last_expiry_check: Some(now),
                last_expiry_check_sent: run.sms_sent,
                last_expiry_check_failed: run.sms_failed,
            })
            .await?;

        info!(
            three_day = run.three_day_matches,
            last_day = run.last_day_matches,
            sent = run.sms_sent,
            failed = run.sms_failed,
            "Expiry check finished"
        );
        Ok(run)
    }

    /// Send one reminder. Errors come back as the message recorded on the run.
    async fn remind(&self, entry: &Entry, kind: ReminderKind) -> Result<(), String> {
        let customer = match self.repos.customers.get(&entry.customer_id).await {
            Ok(Some(customer)) => customer,
            Ok(None) => {
                return Err(format!(
                    "Entry {}: customer {} not found",
                    entry.id, entry.customer_id
                ))
            }
            Err(e) => return Err(format!("Entry {}: {}", entry.id, e)),
        };
        let location = match self.repos.locations.get(&entry.location_id).await {
            Ok(Some(location)) => location,
            Ok(None) => {
                return Err(format!(
                    "Entry {}: location {} not found",
                    entry.id, entry.location_id
                ))
            }
            Err(e) => return Err(format!("Entry {}: {}", entry.id, e)),
        };

        let deceased = if entry.deceased_person_name.is_empty() {
            customer.name.clone()
        } else {
            entry.deceased_person_name.clone()
        };
        let expiry = entry.expiry_date.with_timezone(&self.timezone).date_naive();

        let mut variables = TemplateVariables::new();
        variables.insert("var1".into(), deceased);
        variables.insert("var2".into(), location.venue_name.clone());
        variables.insert("var3".into(), format_template_date(expiry));
        variables.insert("var4".into(), location.contact_number.clone());
        variables.insert("var5".into(), location.venue_name.clone());

        let request = SendRequest {
            recipient: customer.mobile.clone(),
            template_key: kind.template_key().to_string(),
            variables,
            entry_id: Some(entry.id.clone()),
            customer_id: Some(customer.id.clone()),
            location_id: Some(entry.location_id.clone()),
            operator_id: None,
        };

        match self.dispatcher.send_template(&request).await {
            Ok(outcome) if outcome.success => Ok(()),
            Ok(outcome) => Err(format!(
                "Entry {}: {} failed after {} attempts: {}",
                entry.id,
                kind.template_key(),
                outcome.attempts,
                outcome.error.unwrap_or_default()
            )),
            Err(e) => {
                error!(entry = %entry.id, error = %e, "Reminder could not be sent");
                Err(format!("Entry {}: {}", entry.id, e))
            }
        }
    }
}
