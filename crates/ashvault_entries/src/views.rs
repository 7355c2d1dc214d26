// --- File: crates/ashvault_entries/src/views.rs ---
use crate::error::EntryError;
use crate::service::EntryService;
use ashvault_common::models::{Entry, EntryStatus};
use ashvault_common::Caller;
use ashvault_store::repositories::EntryFilter;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Entries expiring within this many days count as expiring soon.
pub const EXPIRING_SOON_DAYS: i64 = 7;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LockerStatus {
    Free,
    Occupied,
    Expired,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerOccupant {
    pub entry_id: String,
    pub customer_name: String,
    pub deceased_person_name: String,
    pub pots: u32,
    pub expiry_date: DateTime<Utc>,
    pub status: EntryStatus,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerSlot {
    pub number: u32,
    pub status: LockerStatus,
    pub total_pots: u32,
    pub occupants: Vec<LockerOccupant>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LockerGrid {
    pub location_id: String,
    pub location_name: String,
    pub total_lockers: u32,
    pub free: u32,
    pub occupied: u32,
    pub expired: u32,
    pub lockers: Vec<LockerSlot>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub location_id: Option<String>,
    pub total_entries: u32,
    pub active: u32,
    pub expired: u32,
    pub delivered: u32,
    pub dispatched: u32,
    pub disposed: u32,
    pub expiring_soon: u32,
    pub pots_in_storage: u32,
    pub total_customers: u32,
}

/// Whether the entry still has pots sitting in its locker.
fn holds_locker(entry: &Entry) -> bool {
    matches!(entry.status, EntryStatus::Active | EntryStatus::Expired) && entry.remaining_pots() > 0
}

/// Build the grid for lockers `1..=total_lockers` from a location's entries.
pub fn build_locker_grid(
    location_id: &str,
    location_name: &str,
    total_lockers: u32,
    entries: &[Entry],
    now: DateTime<Utc>,
) -> LockerGrid {
    let mut by_locker: BTreeMap<u32, Vec<&Entry>> = BTreeMap::new();
    for entry in entries.iter().filter(|e| holds_locker(e)) {
        by_locker.entry(entry.locker_number).or_default().push(entry);
    }

    let mut grid = LockerGrid {
        location_id: location_id.to_string(),
        location_name: location_name.to_string(),
        total_lockers,
        free: 0,
        occupied: 0,
        expired: 0,
        lockers: Vec::with_capacity(total_lockers as usize),
    };

    for number in 1..=total_lockers {
        let occupants: Vec<LockerOccupant> = by_locker
            .get(&number)
            .map(|entries| {
                entries
                    .iter()
                    .map(|e| LockerOccupant {
                        entry_id: e.id.clone(),
                        customer_name: e.customer_name.clone(),
                        deceased_person_name: e.deceased_person_name.clone(),
                        pots: e.remaining_pots(),
                        expiry_date: e.expiry_date,
                        status: e.status,
                    })
                    .collect()
            })
            .unwrap_or_default();

        let status = if occupants.is_empty() {
            grid.free += 1;
            LockerStatus::Free
        } else if occupants
            .iter()
            .any(|o| o.status == EntryStatus::Expired || o.expiry_date < now)
        {
            grid.expired += 1;
            LockerStatus::Expired
        } else {
            grid.occupied += 1;
            LockerStatus::Occupied
        };

        grid.lockers.push(LockerSlot {
            number,
            status,
            total_pots: occupants.iter().map(|o| o.pots).sum(),
            occupants,
        });
    }
    grid
}

pub fn build_dashboard(
    location_id: Option<String>,
    entries: &[Entry],
    total_customers: usize,
    now: DateTime<Utc>,
) -> DashboardStats {
    let soon = now + Duration::days(EXPIRING_SOON_DAYS);
    let mut stats = DashboardStats {
        location_id,
        total_entries: entries.len() as u32,
        total_customers: total_customers as u32,
        ..Default::default()
    };
    for entry in entries {
        match entry.status {
            EntryStatus::Active => stats.active += 1,
            EntryStatus::Expired => stats.expired += 1,
            EntryStatus::Delivered => stats.delivered += 1,
            EntryStatus::Dispatched => stats.dispatched += 1,
            EntryStatus::Disposed => stats.disposed += 1,
        }
        if entry.status == EntryStatus::Active
            && entry.expiry_date >= now
            && entry.expiry_date <= soon
        {
            stats.expiring_soon += 1;
        }
        if holds_locker(entry) {
            stats.pots_in_storage += entry.remaining_pots();
        }
    }
    stats
}

impl EntryService {
    pub async fn locker_grid(&self, caller: &Caller, location_id: &str) -> Result<LockerGrid, EntryError> {
        caller.require_location(location_id)?;
        let location = self.load_location(location_id).await?;
        let entries = self
            .repos
            .entries
            .list(&EntryFilter {
                location_ids: Some(vec![location.id.clone()]),
                ..Default::default()
            })
            .await?;
        Ok(build_locker_grid(
            &location.id,
            &location.venue_name,
            location.number_of_lockers,
            &entries,
            Utc::now(),
        ))
    }

    pub async fn dashboard(
        &self,
        caller: &Caller,
        location_id: Option<String>,
    ) -> Result<DashboardStats, EntryError> {
        let location_ids = caller.scope_locations(location_id)?;
        let entries = self
            .repos
            .entries
            .list(&EntryFilter {
                location_ids: location_ids.clone(),
                ..Default::default()
            })
            .await?;
        let customers = self.repos.customers.list(location_ids.as_deref()).await?;
        let reported = match location_ids.as_deref() {
            Some([single]) => Some(single.clone()),
            _ => None,
        };
        Ok(build_dashboard(reported, &entries, customers.len(), Utc::now()))
    }
}
