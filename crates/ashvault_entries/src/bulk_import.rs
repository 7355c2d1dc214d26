//! Import of legacy register rows into a location.
//!
//! Rows arrive already parsed from CSV by the client. Each row is checked on
//! its own; a bad row is reported and skipped without stopping the batch.

use crate::error::{invalid, EntryError};
use crate::service::EntryService;
use crate::workflows::add_months;
use ashvault_common::models::{Customer, Entry, EntryStatus, Location, Payment, PaymentType};
use ashvault_common::Caller;
use ashvault_sms::mobile::clean_and_validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::info;

fn one() -> u32 {
    1
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRow {
    pub customer_name: String,
    pub customer_mobile: String,
    #[serde(default)]
    pub customer_city: String,
    #[serde(default)]
    pub deceased_person_name: String,
    #[serde(default = "one")]
    pub number_of_pots: u32,
    pub locker_number: u32,
    pub entry_date: Option<DateTime<Utc>>,
    #[serde(default = "one")]
    pub months: u32,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportRequest {
    pub location_id: String,
    pub rows: Vec<BulkImportRow>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// 1-based position in the submitted rows.
    pub row: usize,
    pub message: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportReport {
    pub total: usize,
    pub imported: usize,
    pub skipped: usize,
    pub customers_created: usize,
    pub customers_reused: usize,
    pub entry_ids: Vec<String>,
    pub errors: Vec<RowError>,
}

/// Batch-wide bookkeeping for duplicate and locker checks.
#[derive(Default)]
struct Batch {
    seen: HashSet<(String, String)>,
    lockers: HashSet<u32>,
    customers: HashMap<String, Customer>,
}

impl EntryService {
    pub async fn bulk_import(
        &self,
        caller: &Caller,
        request: BulkImportRequest,
    ) -> Result<BulkImportReport, EntryError> {
        caller.require_location(&request.location_id)?;
        let location = self.load_location(&request.location_id).await?;

        let mut report = BulkImportReport {
            total: request.rows.len(),
            ..Default::default()
        };
        let mut batch = Batch::default();

        for (index, row) in request.rows.into_iter().enumerate() {
            let row_number = index + 1;
            match self.import_row(caller, &location, row, &mut batch, &mut report).await {
                Ok(entry_id) => {
                    report.imported += 1;
                    report.entry_ids.push(entry_id);
                }
                Err(e) => {
                    report.skipped += 1;
                    report.errors.push(RowError {
                        row: row_number,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            location = %location.id,
            total = report.total,
            imported = report.imported,
            skipped = report.skipped,
            "Bulk import finished"
        );
        Ok(report)
    }

    async fn import_row(
        &self,
        caller: &Caller,
        location: &Location,
        row: BulkImportRow,
        batch: &mut Batch,
        report: &mut BulkImportReport,
    ) -> Result<String, EntryError> {
        let mobile = clean_and_validate(&row.customer_mobile)?;
        let name = row.customer_name.trim().to_string();
        if name.is_empty() {
            return Err(invalid("customer name is empty"));
        }
        if row.number_of_pots == 0 || row.months == 0 {
            return Err(invalid("pots and months must be at least 1"));
        }
        if location.number_of_lockers > 0
            && !(1..=location.number_of_lockers).contains(&row.locker_number)
        {
            return Err(invalid(format!(
                "locker {} does not exist at {}",
                row.locker_number, location.venue_name
            )));
        }

        let key = (mobile.clone(), row.deceased_person_name.trim().to_lowercase());
        if batch.seen.contains(&key) {
            return Err(EntryError::Conflict(format!(
                "duplicate of an earlier row for {}",
                mobile
            )));
        }
        if batch.lockers.contains(&row.locker_number) {
            return Err(EntryError::Conflict(format!(
                "locker {} already used by an earlier row",
                row.locker_number
            )));
        }
        let occupied = self
            .repos
            .entries
            .list_by_locker(&location.id, row.locker_number)
            .await?
            .into_iter()
            .any(|e| e.status == EntryStatus::Active);
        if occupied {
            return Err(EntryError::Conflict(format!(
                "locker {} is occupied by an active entry",
                row.locker_number
            )));
        }

        let now = Utc::now();
        let customer = match batch.customers.get(&mobile) {
            Some(customer) => {
                report.customers_reused += 1;
                customer.clone()
            }
            None => {
                let customer = match self.repos.customers.find_by_mobile(&mobile).await? {
                    Some(existing) => {
                        report.customers_reused += 1;
                        existing
                    }
                    None => {
                        report.customers_created += 1;
                        self.repos
                            .customers
                            .create(Customer {
                                id: String::new(),
                                name: name.clone(),
                                mobile: mobile.clone(),
                                city: row.customer_city.clone(),
                                additional_details: None,
                                created_by: caller.id().to_string(),
                                location_id: location.id.clone(),
                                created_at: now,
                                updated_at: now,
                            })
                            .await?
                    }
                };
                batch.customers.insert(mobile.clone(), customer.clone());
                customer
            }
        };

        let entry_date = row.entry_date.unwrap_or(now);
        let expiry_date = add_months(entry_date, row.months)?;
        let status = if expiry_date < now {
            EntryStatus::Expired
        } else {
            EntryStatus::Active
        };
        let entry = Entry {
            id: String::new(),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_mobile: customer.mobile.clone(),
            customer_city: customer.city.clone(),
            deceased_person_name: row.deceased_person_name.trim().to_string(),
            number_of_pots: row.number_of_pots,
            locker_number: row.locker_number,
            location_id: location.id.clone(),
            location_name: location.venue_name.clone(),
            operator_id: caller.id().to_string(),
            payment_method: row.payment_method.clone(),
            entry_date,
            expiry_date,
            status,
            payments: vec![Payment {
                amount: row.amount,
                date: entry_date,
                method: row.payment_method,
                payment_type: PaymentType::Entry,
                months: row.months,
            }],
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
            created_at: now,
            updated_at: now,
        };
        let entry = self.repos.entries.create(entry).await?;

        batch.seen.insert(key);
        batch.lockers.insert(row.locker_number);
        Ok(entry.id)
    }
}
