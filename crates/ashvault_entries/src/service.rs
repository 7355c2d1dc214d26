// --- File: crates/ashvault_entries/src/service.rs ---
use crate::error::EntryError;
use crate::otp::OtpService;
use ashvault_common::models::{Customer, Entry, EntryStatus, Location};
use ashvault_common::Caller;
use ashvault_config::{AppConfig, OtpConfig};
use ashvault_sms::SmsDispatcher;
use ashvault_store::repositories::EntryFilter;
use ashvault_store::Repositories;
use chrono_tz::Tz;
use std::sync::Arc;

/// Entry workflows. Every operation checks the caller against the location
/// it touches.
#[derive(Clone)]
pub struct EntryService {
    pub(crate) repos: Repositories,
    pub(crate) dispatcher: Option<Arc<SmsDispatcher>>,
    pub(crate) otp: OtpService,
    /// Timezone in which dates inside messages are written.
    pub(crate) timezone: Tz,
}

impl EntryService {
    pub fn new(
        repos: Repositories,
        dispatcher: Option<Arc<SmsDispatcher>>,
        otp_config: OtpConfig,
        timezone: Tz,
    ) -> Self {
        let otp = OtpService::new(repos.otp.clone(), otp_config);
        Self {
            repos,
            dispatcher,
            otp,
            timezone,
        }
    }

    pub fn from_config(
        config: &AppConfig,
        repos: Repositories,
        dispatcher: Option<Arc<SmsDispatcher>>,
    ) -> Result<Self, EntryError> {
        let tz_name = config.reminders.clone().unwrap_or_default().timezone;
        let timezone = tz_name
            .parse::<Tz>()
            .map_err(|_| EntryError::Timezone(tz_name.clone()))?;
        Ok(Self::new(repos, dispatcher, config.otp.clone(), timezone))
    }

    pub fn otp(&self) -> &OtpService {
        &self.otp
    }

    pub(crate) async fn load_entry(&self, id: &str) -> Result<Entry, EntryError> {
        self.repos
            .entries
            .get(id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("Entry {}", id)))
    }

    pub(crate) async fn load_location(&self, id: &str) -> Result<Location, EntryError> {
        self.repos
            .locations
            .get(id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("Location {}", id)))
    }

    /// Load an entry the caller may act on.
    pub(crate) async fn entry_for(&self, caller: &Caller, id: &str) -> Result<Entry, EntryError> {
        let entry = self.load_entry(id).await?;
        caller.require_location(&entry.location_id)?;
        Ok(entry)
    }

    pub async fn get_entry(&self, caller: &Caller, id: &str) -> Result<Entry, EntryError> {
        self.entry_for(caller, id).await
    }

    pub async fn list_entries(
        &self,
        caller: &Caller,
        location_id: Option<String>,
        status: Option<EntryStatus>,
        customer_id: Option<String>,
    ) -> Result<Vec<Entry>, EntryError> {
        let filter = EntryFilter {
            location_ids: caller.scope_locations(location_id)?,
            status,
            customer_id,
        };
        Ok(self.repos.entries.list(&filter).await?)
    }

    pub async fn list_customers(
        &self,
        caller: &Caller,
        location_id: Option<String>,
    ) -> Result<Vec<Customer>, EntryError> {
        let location_ids = caller.scope_locations(location_id)?;
        Ok(self.repos.customers.list(location_ids.as_deref()).await?)
    }

    pub async fn get_customer(&self, caller: &Caller, id: &str) -> Result<Customer, EntryError> {
        let customer = self
            .repos
            .customers
            .get(id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("Customer {}", id)))?;
        caller.require_location(&customer.location_id)?;
        Ok(customer)
    }

    /// Customers are shared across locations once they exist, so lookup by
    /// mobile is open to any signed-in caller.
    pub async fn find_customer_by_mobile(&self, mobile: &str) -> Result<Option<Customer>, EntryError> {
        let mobile = ashvault_sms::mobile::clean_and_validate(mobile)?;
        Ok(self.repos.customers.find_by_mobile(&mobile).await?)
    }
}
