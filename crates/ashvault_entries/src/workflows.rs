//! Intake, renewal, dispatch and disposal of entries.
//!
//! Status changes are plain field writes; nothing outside these functions
//! enforces a state machine. Confirmation messages go out after the entry
//! has been saved and their outcome is reported alongside it.

use crate::error::{invalid, EntryError};
use crate::notify::{deceased_name, slots, Notification};
use crate::service::EntryService;
use ashvault_common::models::{
    Customer, DispatchRecord, Entry, EntryStatus, OtpType, Payment, PaymentType, Renewal,
};
use ashvault_common::Caller;
use ashvault_sms::mobile::clean_and_validate;
use ashvault_sms::templates::{
    DELIVERY_CONFIRM_ADMIN, DISPATCH_CONFIRM_CUSTOMER, FINAL_DISPOSAL_REMINDER,
    FINAL_DISPOSAL_REMINDER_ADMIN, RENEWAL_CONFIRM_ADMIN, RENEWAL_CONFIRM_CUSTOMER,
};
use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

pub(crate) fn add_months(date: DateTime<Utc>, months: u32) -> Result<DateTime<Utc>, EntryError> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| invalid(format!("cannot add {} months to {}", months, date)))
}

fn default_months() -> u32 {
    1
}

fn default_pots() -> u32 {
    1
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRequest {
    pub customer_name: String,
    pub customer_mobile: String,
    #[serde(default)]
    pub customer_city: String,
    pub additional_details: Option<String>,
    #[serde(default)]
    pub deceased_person_name: String,
    #[serde(default = "default_pots")]
    pub number_of_pots: u32,
    pub locker_number: u32,
    pub location_id: String,
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    /// Defaults to now.
    pub entry_date: Option<DateTime<Utc>>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenewRequest {
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub payment_method: String,
    /// Verified renewal OTP, when the customer confirmed by code.
    pub otp_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    /// Pots handed over now; all remaining pots when absent.
    pub pots: Option<u32>,
    pub handover_person_name: String,
    pub handover_person_mobile: String,
    pub notes: Option<String>,
    /// Verified delivery OTP, when the customer confirmed by code.
    pub otp_id: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisposeRequest {
    pub notes: Option<String>,
}

/// An updated entry plus the confirmation messages sent for it.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub entry: Entry,
    pub notifications: Vec<Notification>,
}

impl EntryService {
    /// Register ashes: find or create the customer by mobile, then create an
    /// active entry with its first payment.
    pub async fn intake(&self, caller: &Caller, request: IntakeRequest) -> Result<Entry, EntryError> {
        caller.require_location(&request.location_id)?;
        let mobile = clean_and_validate(&request.customer_mobile)?;
        if request.customer_name.trim().is_empty() {
            return Err(invalid("customerName is required"));
        }
        if request.number_of_pots == 0 {
            return Err(invalid("numberOfPots must be at least 1"));
        }
        if request.months == 0 {
            return Err(invalid("months must be at least 1"));
        }

        let location = self.load_location(&request.location_id).await?;
        if !location.is_active {
            return Err(EntryError::Conflict(format!(
                "location {} is inactive",
                location.id
            )));
        }
        if location.number_of_lockers > 0
            && !(1..=location.number_of_lockers).contains(&request.locker_number)
        {
            return Err(invalid(format!(
                "lockerNumber must be between 1 and {}",
                location.number_of_lockers
            )));
        }

        let now = Utc::now();
        let customer = match self.repos.customers.find_by_mobile(&mobile).await? {
            Some(existing) => existing,
            None => {
                self.repos
                    .customers
                    .create(Customer {
                        id: String::new(),
                        name: request.customer_name.trim().to_string(),
                        mobile: mobile.clone(),
                        city: request.customer_city.clone(),
                        additional_details: request.additional_details.clone(),
                        created_by: caller.id().to_string(),
                        location_id: location.id.clone(),
                        created_at: now,
                        updated_at: now,
                    })
                    .await?
            }
        };

        let entry_date = request.entry_date.unwrap_or(now);
        let expiry_date = add_months(entry_date, request.months)?;
        let entry = Entry {
            id: String::new(),
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_mobile: customer.mobile.clone(),
            customer_city: customer.city.clone(),
            deceased_person_name: request.deceased_person_name.trim().to_string(),
            number_of_pots: request.number_of_pots,
            locker_number: request.locker_number,
            location_id: location.id.clone(),
            location_name: location.venue_name.clone(),
            operator_id: caller.id().to_string(),
            payment_method: request.payment_method.clone(),
            entry_date,
            expiry_date,
            status: EntryStatus::Active,
            payments: vec![Payment {
                amount: request.amount,
                date: entry_date,
                method: request.payment_method,
                payment_type: PaymentType::Entry,
                months: request.months,
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
        info!(entry = %entry.id, customer = %customer.id, locker = entry.locker_number, "Entry created");
        Ok(entry)
    }

    /// Extend an entry by `months` from its current expiry.
    pub async fn renew(
        &self,
        caller: &Caller,
        entry_id: &str,
        request: RenewRequest,
    ) -> Result<WorkflowResult, EntryError> {
        let mut entry = self.entry_for(caller, entry_id).await?;
        if request.months == 0 {
            return Err(invalid("months must be at least 1"));
        }
        if let Some(otp_id) = &request.otp_id {
            self.otp
                .consume_verified(otp_id, &entry.id, OtpType::Renewal, Utc::now())
                .await?;
        }
        let location = self.load_location(&entry.location_id).await?;

        let now = Utc::now();
        let previous_expiry_date = entry.expiry_date;
        let new_expiry_date = add_months(previous_expiry_date, request.months)?;
        entry.renewals.push(Renewal {
            amount: request.amount,
            date: now,
            method: request.payment_method.clone(),
            months: request.months,
            previous_expiry_date,
            new_expiry_date,
            renewed_by: caller.id().to_string(),
        });
        entry.payments.push(Payment {
            amount: request.amount,
            date: now,
            method: request.payment_method,
            payment_type: PaymentType::Renewal,
            months: request.months,
        });
        entry.expiry_date = new_expiry_date;
        entry.status = EntryStatus::Active;
        entry.updated_at = now;
        self.repos.entries.save(&entry).await?;
        info!(entry = %entry.id, new_expiry = %new_expiry_date, "Entry renewed");

        let deceased = deceased_name(&entry).to_string();
        let new_expiry = self.message_date(new_expiry_date);
        let customer_sms = self
            .notify(
                RENEWAL_CONFIRM_CUSTOMER,
                &entry.customer_mobile,
                slots(&[
                    &deceased,
                    &location.venue_name,
                    &new_expiry,
                    &location.contact_number,
                    &location.venue_name,
                ]),
                &entry,
                &location,
                caller.id(),
            )
            .await;
        let admin_sms = self
            .notify(
                RENEWAL_CONFIRM_ADMIN,
                &location.contact_number,
                slots(&[&location.venue_name, &deceased]),
                &entry,
                &location,
                caller.id(),
            )
            .await;

        Ok(WorkflowResult {
            entry,
            notifications: vec![customer_sms, admin_sms],
        })
    }

    /// Hand pots back to the family, all at once or in parts.
    pub async fn dispatch(
        &self,
        caller: &Caller,
        entry_id: &str,
        request: DispatchRequest,
    ) -> Result<WorkflowResult, EntryError> {
        let mut entry = self.entry_for(caller, entry_id).await?;

        let remaining = entry.remaining_pots();
        let pots = request.pots.unwrap_or(remaining);
        if pots == 0 || pots > remaining {
            return Err(invalid(format!(
                "pots must be between 1 and {} remaining",
                remaining
            )));
        }
        if request.handover_person_name.trim().is_empty() {
            return Err(invalid("handoverPersonName is required"));
        }
        let handover_mobile = clean_and_validate(&request.handover_person_mobile)?;
        if let Some(otp_id) = &request.otp_id {
            self.otp
                .consume_verified(otp_id, &entry.id, OtpType::Delivery, Utc::now())
                .await?;
        }
        let location = self.load_location(&entry.location_id).await?;

        let now = Utc::now();
        let handover_name = request.handover_person_name.trim().to_string();
        entry.dispatches.push(DispatchRecord {
            date: now,
            pots,
            handover_person_name: handover_name.clone(),
            handover_person_mobile: handover_mobile.clone(),
            notes: request.notes.clone(),
            dispatched_by: caller.id().to_string(),
        });
        entry.delivery_date = Some(now);
        entry.delivered_by = Some(caller.id().to_string());
        entry.handover_person_name = Some(handover_name.clone());
        entry.handover_person_mobile = Some(handover_mobile);
        entry.delivery_notes = request.notes;
        if entry.remaining_pots() == 0 {
            entry.status = EntryStatus::Dispatched;
        }
        entry.updated_at = now;
        self.repos.entries.save(&entry).await?;
        info!(
            entry = %entry.id,
            pots,
            remaining = entry.remaining_pots(),
            "Pots dispatched"
        );

        let deceased = deceased_name(&entry).to_string();
        let dispatch_date = self.message_date(now);
        let customer_sms = self
            .notify(
                DISPATCH_CONFIRM_CUSTOMER,
                &entry.customer_mobile,
                slots(&[
                    &deceased,
                    &location.venue_name,
                    &dispatch_date,
                    &location.contact_number,
                    &handover_name,
                ]),
                &entry,
                &location,
                caller.id(),
            )
            .await;
        let admin_sms = self
            .notify(
                DELIVERY_CONFIRM_ADMIN,
                &location.contact_number,
                slots(&[&location.venue_name, &deceased]),
                &entry,
                &location,
                caller.id(),
            )
            .await;

        Ok(WorkflowResult {
            entry,
            notifications: vec![customer_sms, admin_sms],
        })
    }

    /// Mark an unclaimed entry as disposed.
    pub async fn dispose(
        &self,
        caller: &Caller,
        entry_id: &str,
        request: DisposeRequest,
    ) -> Result<WorkflowResult, EntryError> {
        let mut entry = self.entry_for(caller, entry_id).await?;
        let location = self.load_location(&entry.location_id).await?;

        let now = Utc::now();
        entry.status = EntryStatus::Disposed;
        entry.disposal_date = Some(now);
        entry.disposed_by = Some(caller.id().to_string());
        entry.disposal_notes = request.notes;
        entry.updated_at = now;
        self.repos.entries.save(&entry).await?;
        info!(entry = %entry.id, "Entry disposed");

        let deceased = deceased_name(&entry).to_string();
        let customer_sms = self
            .notify(
                FINAL_DISPOSAL_REMINDER,
                &entry.customer_mobile,
                slots(&[&deceased, &location.venue_name]),
                &entry,
                &location,
                caller.id(),
            )
            .await;
        let admin_sms = self
            .notify(
                FINAL_DISPOSAL_REMINDER_ADMIN,
                &location.contact_number,
                slots(&[&location.venue_name, &deceased]),
                &entry,
                &location,
                caller.id(),
            )
            .await;

        Ok(WorkflowResult {
            entry,
            notifications: vec![customer_sms, admin_sms],
        })
    }
}
