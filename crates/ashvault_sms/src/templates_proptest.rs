#[cfg(test)]
mod tests {
    use crate::templates::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_formatted_values_come_back_in_slot_order(
            values in proptest::collection::vec("[A-Za-z0-9 /]{1,20}", 5)
        ) {
            let vars: TemplateVariables = values
                .iter()
                .enumerate()
                .map(|(i, v)| (format!("var{}", i + 1), v.clone()))
                .collect();

            let out = format_variables_for_api(THREE_DAY_REMINDER, &vars).unwrap();
            let split: Vec<&str> = out.split(VARIABLE_SEPARATOR).collect();
            prop_assert_eq!(split, values.iter().map(String::as_str).collect::<Vec<_>>());
        }

        #[test]
        fn test_dropping_any_slot_is_rejected(missing in 1usize..=5) {
            let vars: TemplateVariables = (1..=5)
                .filter(|i| *i != missing)
                .map(|i| (format!("var{}", i), format!("value{}", i)))
                .collect();
            prop_assert!(format_variables_for_api(LAST_DAY_RENEWAL, &vars).is_err());
        }
    }
}
