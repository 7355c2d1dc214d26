//! Pre-send checks on template variables.
//!
//! Besides required-slot presence, two shape heuristics run on fixed slot
//! positions no matter what the template stores there:
//!
//! - `var4`, `var5`, `var6`: a ten-digit value must be an Indian mobile
//!   (`[6-9]` followed by nine digits). Anything that is not ten digits,
//!   such as a location name, passes.
//! - `var3`: a date-shaped value (digit groups split by `/` or `-`) must be
//!   `DD/MM/YYYY`.
//!
//! Country-code prefixes are not stripped here; see [`crate::mobile`].

use crate::templates::{get_template_by_key, TemplateVariables};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static TEN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{10}$").expect("valid regex"));
static INDIAN_MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid regex"));
static DATE_SHAPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,4}[/-]\d{1,2}[/-]\d{1,4}$").expect("valid regex"));
static DD_MM_YYYY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid regex"));

const MOBILE_POSITIONS: [u8; 3] = [4, 5, 6];
const DATE_POSITION: u8 = 3;

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

pub fn validate_template_variables(
    template_key: &str,
    variables: &TemplateVariables,
) -> ValidationResult {
    let Some(template) = get_template_by_key(template_key) else {
        return ValidationResult::from_errors(vec![format!(
            "Template not found: {}",
            template_key
        )]);
    };

    let mut errors = Vec::new();

    for position in 1..=template.variable_count() {
        let Some(slot) = template
            .variables
            .iter()
            .find(|v| usize::from(v.position) == position)
        else {
            continue;
        };
        let present = variables.get(&slot.name).is_some_and(|v| !v.is_empty());
        if slot.required && !present {
            errors.push(format!("Missing required variable: {}", slot.name));
        }
    }

    for position in MOBILE_POSITIONS {
        let name = format!("var{}", position);
        if let Some(value) = variables.get(&name) {
            if TEN_DIGITS.is_match(value) && !INDIAN_MOBILE.is_match(value) {
                errors.push(format!(
                    "Invalid mobile number format in {}: {}",
                    name, value
                ));
            }
        }
    }

    let date_name = format!("var{}", DATE_POSITION);
    if let Some(value) = variables.get(&date_name) {
        if DATE_SHAPED.is_match(value) && !DD_MM_YYYY.is_match(value) {
            errors.push(format!(
                "Invalid date format in {}: {} (expected DD/MM/YYYY)",
                date_name, value
            ));
        }
    }

    ValidationResult::from_errors(errors)
}
