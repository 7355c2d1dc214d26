//! Model builders shared by the test suites of the workspace crates.

use crate::auth::Caller;
use crate::models::{Customer, Entry, EntryStatus, Location, User, UserRole};
use chrono::{DateTime, Duration, Utc};

pub fn user(id: &str, role: UserRole, location_ids: &[&str]) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        email: format!("{}@example.com", id),
        name: id.to_string(),
        mobile: None,
        role,
        is_active: true,
        is_rejected: false,
        location_ids: location_ids.iter().map(|s| s.to_string()).collect(),
        approved_by: None,
        approved_at: None,
        rejected_by: None,
        rejected_at: None,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn admin() -> Caller {
    Caller::new(user("admin1", UserRole::Admin, &[]))
}

pub fn operator(location_ids: &[&str]) -> Caller {
    Caller::new(user("op1", UserRole::Operator, location_ids))
}

pub fn location(venue_name: &str, lockers: u32) -> Location {
    let now = Utc::now();
    Location {
        id: String::new(),
        venue_name: venue_name.to_string(),
        address: "1 Temple Road".to_string(),
        contact_number: "9123456789".to_string(),
        is_active: true,
        number_of_lockers: lockers,
        created_at: now,
        updated_at: now,
    }
}

pub fn customer(name: &str, mobile: &str, location_id: &str) -> Customer {
    let now = Utc::now();
    Customer {
        id: String::new(),
        name: name.to_string(),
        mobile: mobile.to_string(),
        city: "Pune".to_string(),
        additional_details: None,
        created_by: "op1".to_string(),
        location_id: location_id.to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// An active single-pot entry for `customer` in `location`.
pub fn entry(
    customer: &Customer,
    location: &Location,
    locker_number: u32,
    expiry_date: DateTime<Utc>,
) -> Entry {
    let entry_date = expiry_date - Duration::days(30);
    Entry {
        id: String::new(),
        customer_id: customer.id.clone(),
        customer_name: customer.name.clone(),
        customer_mobile: customer.mobile.clone(),
        customer_city: customer.city.clone(),
        deceased_person_name: "Ravi".to_string(),
        number_of_pots: 1,
        locker_number,
        location_id: location.id.clone(),
        location_name: location.venue_name.clone(),
        operator_id: "op1".to_string(),
        payment_method: "cash".to_string(),
        entry_date,
        expiry_date,
        status: EntryStatus::Active,
        payments: Vec::new(),
        renewals: Vec::new(),
        dispatches: Vec::new(),
        delivery_date: None,
        delivered_by: None,
        handover_person_name: None,
        handover_person_mobile: None,
        delivery_notes: None,
        disposal_date: None,
        disposed_by: None,
        disposal_notes: None,
        created_at: entry_date,
        updated_at: entry_date,
    }
}
