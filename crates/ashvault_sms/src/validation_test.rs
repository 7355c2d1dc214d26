#[cfg(test)]
mod tests {
    use crate::templates::{
        TemplateVariables, DISPATCH_CONFIRM_CUSTOMER, RENEWAL_CONFIRM_ADMIN, THREE_DAY_REMINDER,
    };
    use crate::validation::validate_template_variables;

    fn vars(pairs: &[(&str, &str)]) -> TemplateVariables {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn reminder_vars() -> TemplateVariables {
        vars(&[
            ("var1", "Ravi"),
            ("var2", "North Hall"),
            ("var3", "24/09/2025"),
            ("var4", "9876543210"),
            ("var5", "North Hall"),
        ])
    }

    #[test]
    fn test_complete_reminder_is_valid() {
        let result = validate_template_variables(THREE_DAY_REMINDER, &reminder_vars());
        assert!(result.is_valid, "{:?}", result.errors);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_unknown_template() {
        let result = validate_template_variables("bogus", &TemplateVariables::new());
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["Template not found: bogus".to_string()]);
    }

    #[test]
    fn test_reports_missing_slot() {
        let mut v = reminder_vars();
        v.remove("var3");
        let result = validate_template_variables(THREE_DAY_REMINDER, &v);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Missing required variable: var3".to_string()]
        );
    }

    #[test]
    fn test_ten_digit_non_mobile_in_var4_is_rejected() {
        let mut v = reminder_vars();
        v.insert("var4".into(), "1234567890".into());
        let result = validate_template_variables(THREE_DAY_REMINDER, &v);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Invalid mobile number format in var4: 1234567890".to_string()]
        );
    }

    #[test]
    fn test_non_numeric_var4_passes_mobile_check() {
        let mut v = reminder_vars();
        v.insert("var4".into(), "Location X".into());
        let result = validate_template_variables(THREE_DAY_REMINDER, &v);
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_var5_mobile_check_applies_regardless_of_meaning() {
        let v = vars(&[
            ("var1", "Ravi"),
            ("var2", "North Hall"),
            ("var3", "01/01/2026"),
            ("var4", "9876543210"),
            ("var5", "0123456789"),
        ]);
        let result = validate_template_variables(DISPATCH_CONFIRM_CUSTOMER, &v);
        assert!(!result.is_valid);
        assert!(result.errors[0].contains("var5"));
    }

    #[test]
    fn test_date_shaped_var3_must_be_dd_mm_yyyy() {
        let mut v = reminder_vars();
        v.insert("var3".into(), "2025-09-24".into());
        let result = validate_template_variables(THREE_DAY_REMINDER, &v);
        assert_eq!(
            result.errors,
            vec!["Invalid date format in var3: 2025-09-24 (expected DD/MM/YYYY)".to_string()]
        );

        v.insert("var3".into(), "Tuesday".into());
        assert!(validate_template_variables(THREE_DAY_REMINDER, &v).is_valid);
    }

    #[test]
    fn test_collects_every_problem() {
        let v = vars(&[("var4", "1234567890")]);
        let result = validate_template_variables(RENEWAL_CONFIRM_ADMIN, &v);
        assert_eq!(
            result.errors,
            vec![
                "Missing required variable: var1".to_string(),
                "Missing required variable: var2".to_string(),
                "Invalid mobile number format in var4: 1234567890".to_string(),
            ]
        );
    }
}
