//! Shared setup for this crate's tests.

use crate::service::EntryService;
use ashvault_common::models::{Customer, Location};
use ashvault_common::testing::{customer, location};
use ashvault_config::OtpConfig;
use ashvault_sms::mock::ScriptedGateway;
use ashvault_sms::{RetryPolicy, SmsDispatcher};
use ashvault_store::{MemoryStore, Repositories};
use std::sync::Arc;
use std::time::Duration;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub repos: Repositories,
    pub gateway: Arc<ScriptedGateway>,
    pub service: EntryService,
}

pub fn harness() -> Harness {
    harness_with(ScriptedGateway::new())
}

pub fn harness_with(gateway: ScriptedGateway) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let repos = Repositories::new(store.clone());
    let gateway = Arc::new(gateway);
    let dispatcher = Arc::new(SmsDispatcher::new(
        gateway.clone(),
        repos.sms_logs.clone(),
        RetryPolicy {
            max_attempts: 1,
            delay: Duration::ZERO,
        },
    ));
    let service = EntryService::new(
        repos.clone(),
        Some(dispatcher),
        OtpConfig::default(),
        chrono_tz::Asia::Kolkata,
    );
    Harness {
        store,
        repos,
        gateway,
        service,
    }
}

impl Harness {
    pub async fn location(&self, name: &str, lockers: u32) -> Location {
        self.repos.locations.create(location(name, lockers)).await.unwrap()
    }

    pub async fn customer(&self, name: &str, mobile: &str, location_id: &str) -> Customer {
        self.repos
            .customers
            .create(customer(name, mobile, location_id))
            .await
            .unwrap()
    }
}
