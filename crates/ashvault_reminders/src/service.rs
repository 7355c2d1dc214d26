// --- File: crates/ashvault_reminders/src/service.rs ---
use crate::error::ReminderError;
use crate::job::ReminderJob;
use crate::scheduler::{self, DailySchedule};
use ashvault_common::is_reminders_enabled;
use ashvault_config::AppConfig;
use ashvault_sms::SmsDispatcher;
use ashvault_store::Repositories;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// The job exists whenever SMS can be sent, so manual runs work even with
/// the daily schedule switched off.
pub fn build_job(
    config: &AppConfig,
    repos: &Repositories,
    dispatcher: Option<Arc<SmsDispatcher>>,
) -> Result<Option<Arc<ReminderJob>>, ReminderError> {
    let Some(dispatcher) = dispatcher else {
        return Ok(None);
    };
    let reminder_config = config.reminders.clone().unwrap_or_default();
    let job = ReminderJob::from_config(&reminder_config, repos.clone(), dispatcher)?;
    Ok(Some(Arc::new(job)))
}

/// Starts the daily trigger when reminders are enabled.
pub fn start_scheduler(
    config: &AppConfig,
    job: Option<Arc<ReminderJob>>,
) -> Result<Option<JoinHandle<()>>, ReminderError> {
    if !is_reminders_enabled(config) {
        info!("Daily reminder schedule disabled by configuration");
        return Ok(None);
    }
    let Some(job) = job else {
        return Err(ReminderError::Disabled);
    };
    let reminder_config = config.reminders.clone().unwrap_or_default();
    let schedule = DailySchedule::new(reminder_config.hour, reminder_config.minute, job.timezone())?;
    info!(
        hour = reminder_config.hour,
        minute = reminder_config.minute,
        timezone = %reminder_config.timezone,
        "Starting daily reminder schedule"
    );
    Ok(Some(scheduler::spawn(job, schedule)))
}
