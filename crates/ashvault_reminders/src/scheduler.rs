// --- File: crates/ashvault_reminders/src/scheduler.rs ---
use crate::error::ReminderError;
use crate::job::ReminderJob;
use ashvault_common::logging::log_result;
use ashvault_common::models::RunTrigger;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Daily trigger time in a timezone.
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    pub time: NaiveTime,
    pub timezone: Tz,
}

impl DailySchedule {
    pub fn new(hour: u32, minute: u32, timezone: Tz) -> Result<Self, ReminderError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(ReminderError::InvalidTime { hour, minute })?;
        Ok(Self { time, timezone })
    }

    /// First trigger strictly after `now`.
    ///
    /// A trigger time skipped by a DST jump fires an hour later; an
    /// ambiguous one fires at its first occurrence.
    pub fn next_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let mut day = now.with_timezone(&self.timezone).date_naive();
        loop {
            let local = day.and_time(self.time);
            let candidate = self
                .timezone
                .from_local_datetime(&local)
                .earliest()
                .or_else(|| {
                    self.timezone
                        .from_local_datetime(&(local + Duration::hours(1)))
                        .earliest()
                })
                .map(|t| t.with_timezone(&Utc));
            if let Some(candidate) = candidate {
                if candidate > now {
                    return candidate;
                }
            }
            day = day.succ_opt().unwrap_or(day);
        }
    }
}

/// Run `job` every day at `schedule` until the task is aborted.
pub fn spawn(job: Arc<ReminderJob>, schedule: DailySchedule) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let now = Utc::now();
            let next = schedule.next_after(now);
            let wait = (next - now).to_std().unwrap_or_default();
            info!(next_run = %next, "Reminder job scheduled");
            tokio::time::sleep(wait).await;

            let _ = log_result(
                job.run(RunTrigger::Scheduled).await,
                "Scheduled expiry check completed",
                "Scheduled expiry check failed",
            );
        }
    })
}
