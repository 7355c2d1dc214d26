//! The DLT template registry and the pipe-delimited variable formatter.
//!
//! Every template is pre-registered with the gateway under a numeric message
//! id and a fixed number of positional slots. Slots are named `var1..varN`
//! after their position.

use crate::error::SmsError;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variables keyed by slot name (`var1`, `var2`, ...).
pub type TemplateVariables = BTreeMap<String, String>;

/// Separator expected by the gateway between positional values.
pub const VARIABLE_SEPARATOR: &str = "|";

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Reminder,
    Confirmation,
    Disposal,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVariable {
    pub name: String,
    pub position: u8,
    pub required: bool,
    pub description: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsTemplate {
    pub key: String,
    /// Message id registered with the gateway.
    pub id: String,
    pub name: String,
    pub variables: Vec<TemplateVariable>,
    pub category: TemplateCategory,
}

impl SmsTemplate {
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }
}

pub const THREE_DAY_REMINDER: &str = "threeDayReminder";
pub const LAST_DAY_RENEWAL: &str = "lastdayRenewal";
pub const RENEWAL_CONFIRM_CUSTOMER: &str = "renewalConfirmCustomer";
pub const RENEWAL_CONFIRM_ADMIN: &str = "renewalConfirmAdmin";
pub const DISPATCH_CONFIRM_CUSTOMER: &str = "dispatchConfirmCustomer";
pub const DELIVERY_CONFIRM_ADMIN: &str = "deliveryConfirmAdmin";
pub const FINAL_DISPOSAL_REMINDER: &str = "finalDisposalReminder";
pub const FINAL_DISPOSAL_REMINDER_ADMIN: &str = "finalDisposalReminderAdmin";

fn template(
    key: &str,
    id: &str,
    name: &str,
    category: TemplateCategory,
    slots: &[&str],
) -> SmsTemplate {
    SmsTemplate {
        key: key.to_string(),
        id: id.to_string(),
        name: name.to_string(),
        category,
        variables: slots
            .iter()
            .enumerate()
            .map(|(i, description)| TemplateVariable {
                name: format!("var{}", i + 1),
                position: (i + 1) as u8,
                required: true,
                description: description.to_string(),
            })
            .collect(),
    }
}

static TEMPLATES: Lazy<Vec<SmsTemplate>> = Lazy::new(|| {
    use TemplateCategory::*;
    vec![
        template(
            THREE_DAY_REMINDER,
            "198233",
            "Three Day Expiry Reminder",
            Reminder,
            &[
                "Deceased person name",
                "Location name",
                "Expiry date (DD/MM/YYYY)",
                "Location contact number",
                "Location name",
            ],
        ),
        template(
            LAST_DAY_RENEWAL,
            "198234",
            "Last Day Renewal Reminder",
            Reminder,
            &[
                "Deceased person name",
                "Location name",
                "Expiry date (DD/MM/YYYY)",
                "Location contact number",
                "Location name",
            ],
        ),
        template(
            RENEWAL_CONFIRM_CUSTOMER,
            "198235",
            "Renewal Confirmation",
            Confirmation,
            &[
                "Deceased person name",
                "Location name",
                "New expiry date (DD/MM/YYYY)",
                "Location contact number",
                "Location name",
            ],
        ),
        template(
            RENEWAL_CONFIRM_ADMIN,
            "198236",
            "Renewal Confirmation (Admin)",
            Confirmation,
            &["Location name", "Deceased person name"],
        ),
        template(
            DISPATCH_CONFIRM_CUSTOMER,
            "198237",
            "Dispatch Confirmation",
            Confirmation,
            &[
                "Deceased person name",
                "Location name",
                "Dispatch date (DD/MM/YYYY)",
                "Location contact number",
                "Handover person name",
            ],
        ),
        template(
            DELIVERY_CONFIRM_ADMIN,
            "198238",
            "Delivery Confirmation (Admin)",
            Confirmation,
            &["Location name", "Deceased person name"],
        ),
        template(
            FINAL_DISPOSAL_REMINDER,
            "198239",
            "Final Disposal Notice",
            Disposal,
            &["Deceased person name", "Location name"],
        ),
        template(
            FINAL_DISPOSAL_REMINDER_ADMIN,
            "198240",
            "Final Disposal Notice (Admin)",
            Disposal,
            &["Location name", "Deceased person name"],
        ),
    ]
});

pub fn all_templates() -> &'static [SmsTemplate] {
    &TEMPLATES
}

pub fn get_template_by_key(key: &str) -> Option<&'static SmsTemplate> {
    TEMPLATES.iter().find(|t| t.key == key)
}

pub fn get_template_by_id(id: &str) -> Option<&'static SmsTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub fn get_templates_by_category(category: TemplateCategory) -> Vec<&'static SmsTemplate> {
    TEMPLATES.iter().filter(|t| t.category == category).collect()
}

/// Dates inside messages are always `DD/MM/YYYY`.
pub fn format_template_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Render `variables` as the gateway's `variables_values` string.
///
/// Values are taken in slot position order and joined with `|`. A missing
/// or empty required slot is an error; a missing optional slot becomes an
/// empty string.
pub fn format_variables_for_api(
    template_key: &str,
    variables: &TemplateVariables,
) -> Result<String, SmsError> {
    let template = get_template_by_key(template_key)
        .ok_or_else(|| SmsError::TemplateNotFound(template_key.to_string()))?;

    let mut slots: Vec<&TemplateVariable> = template.variables.iter().collect();
    slots.sort_by_key(|v| v.position);

    let mut values = Vec::with_capacity(slots.len());
    for slot in slots {
        match variables.get(&slot.name).filter(|v| !v.is_empty()) {
            Some(value) => values.push(value.as_str()),
            None if slot.required => {
                return Err(SmsError::MissingVariable {
                    variable: slot.name.clone(),
                    template: template_key.to_string(),
                })
            }
            None => values.push(""),
        }
    }

    Ok(values.join(VARIABLE_SEPARATOR))
}
