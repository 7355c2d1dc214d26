// --- File: crates/services/ashvault_backend/src/app_state.rs ---
use crate::auth::AuthState;
use ashvault_admin::{AdminService, AdminState};
use ashvault_common::AshvaultError;
use ashvault_config::AppConfig;
use ashvault_entries::{EntriesState, EntryService};
use ashvault_reminders::{build_job, ReminderJob, ReminderState};
use ashvault_sms::{build_dispatcher, SmsState};
use ashvault_store::{DocumentStore, Repositories};
use std::sync::Arc;

/// Everything the routers and the scheduler share.
///
/// Each feature crate gets its own state; all of them point at the same
/// repositories and the same SMS dispatcher.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repos: Repositories,
    pub auth: Arc<AuthState>,
    pub sms: Arc<SmsState>,
    pub reminders: Arc<ReminderState>,
    pub entries: Arc<EntriesState>,
    pub admin: Arc<AdminState>,
    /// Kept separately for the scheduler.
    pub job: Option<Arc<ReminderJob>>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, store: Arc<dyn DocumentStore>) -> Result<Self, AshvaultError> {
        let repos = Repositories::new(store);
        let dispatcher = build_dispatcher(&config, &repos)?;
        let job = build_job(&config, &repos, dispatcher.clone())?;
        let entry_service = EntryService::from_config(&config, repos.clone(), dispatcher.clone())?;

        Ok(Self {
            auth: Arc::new(AuthState::from_config(&config, repos.users.clone())?),
            sms: Arc::new(SmsState {
                config: config.clone(),
                repos: repos.clone(),
                dispatcher,
            }),
            reminders: Arc::new(ReminderState {
                repos: repos.clone(),
                job: job.clone(),
            }),
            entries: Arc::new(EntriesState {
                service: Arc::new(entry_service),
            }),
            admin: Arc::new(AdminState {
                service: Arc::new(AdminService::new(repos.clone())),
            }),
            job,
            repos,
            config,
        })
    }
}
