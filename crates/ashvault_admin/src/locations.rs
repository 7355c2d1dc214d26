//! Cremation-ground venues and their locker counts.

use crate::error::AdminError;
use crate::service::AdminService;
use ashvault_common::models::{Entry, EntryStatus, Location};
use ashvault_common::Caller;
use ashvault_sms::mobile::clean_and_validate;
use ashvault_store::repositories::EntryFilter;
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;

fn default_true() -> bool {
    true
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLocationRequest {
    pub venue_name: String,
    #[serde(default)]
    pub address: String,
    pub contact_number: String,
    pub number_of_lockers: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLocationRequest {
    pub venue_name: Option<String>,
    pub address: Option<String>,
    pub contact_number: Option<String>,
    pub number_of_lockers: Option<u32>,
    pub is_active: Option<bool>,
}

fn require_name(name: &str) -> Result<String, AdminError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AdminError::InvalidInput("venue name is empty".to_string()));
    }
    Ok(name.to_string())
}

impl AdminService {
    async fn load_location(&self, id: &str) -> Result<Location, AdminError> {
        self.repos
            .locations
            .get(id)
            .await?
            .ok_or_else(|| AdminError::NotFound(format!("Location {}", id)))
    }

    /// Locations the caller may see. Operators only get their assigned ones.
    pub async fn list_locations(
        &self,
        caller: &Caller,
        active_only: bool,
    ) -> Result<Vec<Location>, AdminError> {
        let locations = self.repos.locations.list(active_only).await?;
        Ok(locations
            .into_iter()
            .filter(|l| caller.user.can_access_location(&l.id))
            .collect())
    }

    pub async fn get_location(&self, caller: &Caller, id: &str) -> Result<Location, AdminError> {
        caller.require_location(id)?;
        self.load_location(id).await
    }

    pub async fn create_location(
        &self,
        caller: &Caller,
        request: CreateLocationRequest,
    ) -> Result<Location, AdminError> {
        caller.require_admin()?;
        let now = Utc::now();
        let location = Location {
            id: String::new(),
            venue_name: require_name(&request.venue_name)?,
            address: request.address.trim().to_string(),
            contact_number: clean_and_validate(&request.contact_number)?,
            is_active: request.is_active,
            number_of_lockers: request.number_of_lockers,
            created_at: now,
            updated_at: now,
        };
        let location = self.repos.locations.create(location).await?;
        info!(location = %location.id, venue = %location.venue_name, "Location created");
        Ok(location)
    }

    /// Shrinking below a locker that still holds ashes is refused.
    pub async fn update_location(
        &self,
        caller: &Caller,
        id: &str,
        request: UpdateLocationRequest,
    ) -> Result<Location, AdminError> {
        caller.require_admin()?;
        let mut location = self.load_location(id).await?;
        let mut fields = Map::new();

        if let Some(name) = request.venue_name {
            location.venue_name = require_name(&name)?;
            fields.insert("venueName".into(), Value::from(location.venue_name.clone()));
        }
        if let Some(address) = request.address {
            location.address = address.trim().to_string();
            fields.insert("address".into(), Value::from(location.address.clone()));
        }
        if let Some(contact) = request.contact_number {
            location.contact_number = clean_and_validate(&contact)?;
            fields.insert(
                "contactNumber".into(),
                Value::from(location.contact_number.clone()),
            );
        }
        if let Some(lockers) = request.number_of_lockers {
            if lockers < location.number_of_lockers {
                let highest_used = self
                    .open_entries(id)
                    .await?
                    .iter()
                    .map(|e| e.locker_number)
                    .max()
                    .unwrap_or(0);
                if highest_used > lockers {
                    return Err(AdminError::Conflict(format!(
                        "locker {} is still in use",
                        highest_used
                    )));
                }
            }
            location.number_of_lockers = lockers;
            fields.insert("numberOfLockers".into(), Value::from(lockers));
        }
        if let Some(active) = request.is_active {
            location.is_active = active;
            fields.insert("isActive".into(), Value::from(active));
        }

        location.updated_at = Utc::now();
        fields.insert("updatedAt".into(), Value::from(location.updated_at.to_rfc3339()));
        self.repos.locations.update(id, Value::Object(fields)).await?;
        info!(location = %id, "Location updated");
        Ok(location)
    }

    /// Only locations without active or expired entries can be removed.
    pub async fn delete_location(&self, caller: &Caller, id: &str) -> Result<(), AdminError> {
        caller.require_admin()?;
        self.load_location(id).await?;
        let open = self.open_entries(id).await?;
        if !open.is_empty() {
            return Err(AdminError::Conflict(format!(
                "location {} still has {} stored entries",
                id,
                open.len()
            )));
        }
        self.repos.locations.delete(id).await?;
        info!(location = %id, "Location deleted");
        Ok(())
    }

    async fn open_entries(&self, location_id: &str) -> Result<Vec<Entry>, AdminError> {
        let entries = self
            .repos
            .entries
            .list(&EntryFilter {
                location_ids: Some(vec![location_id.to_string()]),
                ..Default::default()
            })
            .await?;
        Ok(entries
            .into_iter()
            .filter(|e| matches!(e.status, EntryStatus::Active | EntryStatus::Expired))
            .collect())
    }
}
