//! Tests for payload validation

#[cfg(test)]
mod tests {
    use crate::{
        error::RegistryError,
        types::{
            BatchQuality, BeekeeperProfilePayload, CarbonCreditPayload, Caller, Hive, HivePayload,
            HiveStatus, HoneyBatchPayload, InvestmentPayload,
        },
        validation::Validator,
    };

    fn beekeeper_payload(first: &str, last: &str, email: &str) -> BeekeeperProfilePayload {
        BeekeeperProfilePayload {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            phone_number: "+254700000000".to_string(),
            county: "Nakuru".to_string(),
            location: "Njoro".to_string(),
            years_of_experience: 4,
            certifications: vec![],
        }
    }

    fn hive_with(current: f64, target: f64) -> Hive {
        Hive {
            id: "hive-1".to_string(),
            beekeeper_id: "bk-1".to_string(),
            beekeeper: Caller::zero(),
            location: "Njoro".to_string(),
            installation_date: "2025-01-01".to_string(),
            status: HiveStatus::Active,
            estimated_yield: 20.0,
            current_investment: current,
            target_investment: target,
            investors: vec![],
            honey_batches: vec![],
            carbon_credits: vec![],
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn investment(amount: f64) -> InvestmentPayload {
        InvestmentPayload {
            hive_id: "hive-1".to_string(),
            amount,
            expected_return: 12.5,
            maturity_date: None,
        }
    }

    fn is_invalid<T: std::fmt::Debug>(result: Result<T, RegistryError>) -> bool {
        matches!(result, Err(RegistryError::InvalidPayload(_)))
    }

    #[test]
    fn test_accepts_well_formed_profile() {
        let validator = Validator::new().unwrap();
        let payload = beekeeper_payload("Wanjiru", "Mwangi-Kamau", "wanjiru@example.com");
        assert!(validator.validate_beekeeper(&payload).is_ok());
    }

    #[test]
    fn test_rejects_bad_names() {
        let validator = Validator::new().unwrap();

        // Too short
        assert!(is_invalid(validator.validate_beekeeper(&beekeeper_payload("W", "Mwangi", "a@b.co"))));
        // Digits are not allowed
        assert!(is_invalid(validator.validate_beekeeper(&beekeeper_payload("Wanjiru2", "Mwangi", "a@b.co"))));
        // 51 characters
        let long = "a".repeat(51);
        assert!(is_invalid(validator.validate_beekeeper(&beekeeper_payload("Wanjiru", &long, "a@b.co"))));
        // Exactly 50 is fine
        let max = "a".repeat(50);
        assert!(validator.validate_beekeeper(&beekeeper_payload("Wanjiru", &max, "a@b.co")).is_ok());
    }

    #[test]
    fn test_rejects_bad_emails() {
        let validator = Validator::new().unwrap();
        for email in ["", "plain", "no@dot", "two words@example.com", "@example.com"] {
            assert!(
                is_invalid(validator.validate_beekeeper(&beekeeper_payload("Wanjiru", "Mwangi", email))),
                "expected {:?} to be rejected",
                email
            );
        }
    }

    #[test]
    fn test_hive_requires_positive_numbers() {
        let validator = Validator::new().unwrap();
        let mut payload = HivePayload {
            location: "Njoro".to_string(),
            installation_date: "2025-01-01".to_string(),
            estimated_yield: 20.0,
            target_investment: 500.0,
        };
        assert!(validator.validate_hive(&payload).is_ok());

        payload.estimated_yield = 0.0;
        assert!(is_invalid(validator.validate_hive(&payload)));

        payload.estimated_yield = 20.0;
        payload.target_investment = -1.0;
        assert!(is_invalid(validator.validate_hive(&payload)));

        payload.target_investment = f64::NAN;
        assert!(is_invalid(validator.validate_hive(&payload)));
    }

    #[test]
    fn test_honey_batch_score_range() {
        let validator = Validator::new().unwrap();
        let mut payload = HoneyBatchPayload {
            hive_id: "hive-1".to_string(),
            harvest_date: "2025-03-01".to_string(),
            quantity: 12.0,
            quality: BatchQuality::Organic,
            quality_score: 100,
            location: "Njoro".to_string(),
            price_per_kg: Some(8.0),
        };
        assert!(validator.validate_honey_batch(&payload).is_ok());

        payload.quality_score = 101;
        assert!(is_invalid(validator.validate_honey_batch(&payload)));

        payload.quality_score = 0;
        payload.quantity = 0.0;
        assert!(is_invalid(validator.validate_honey_batch(&payload)));

        payload.quantity = 1.0;
        payload.price_per_kg = Some(-3.0);
        assert!(is_invalid(validator.validate_honey_batch(&payload)));
    }

    #[test]
    fn test_carbon_credit_requires_positive_area_and_offset() {
        let validator = Validator::new().unwrap();
        let mut payload = CarbonCreditPayload {
            hive_id: "hive-1".to_string(),
            pollination_area: 2.5,
            carbon_offset: 0.8,
            issue_date: "2025-01-01".to_string(),
            expiry_date: "2030-01-01".to_string(),
            price_per_ton: None,
        };
        assert!(validator.validate_carbon_credit(&payload).is_ok());

        payload.carbon_offset = 0.0;
        assert!(is_invalid(validator.validate_carbon_credit(&payload)));
    }

    #[test]
    fn test_investment_cap_is_inclusive() {
        let validator = Validator::new().unwrap();
        let hive = hive_with(200.0, 500.0);

        // Filling the hive exactly to its target is allowed
        assert!(validator.validate_investment(&investment(300.0), &hive).is_ok());
        // One unit over is not
        assert!(is_invalid(validator.validate_investment(&investment(301.0), &hive)));
    }

    #[test]
    fn test_checked_total_rejects_overflow() {
        let validator = Validator::new().unwrap();
        assert_eq!(validator.checked_total("Total", 10.0, 2.5).unwrap(), 12.5);
        assert!(is_invalid(validator.checked_total("Total", f64::MAX, f64::MAX)));
    }

    #[test]
    fn test_investment_amount_must_be_positive() {
        let validator = Validator::new().unwrap();
        let hive = hive_with(0.0, 500.0);
        assert!(is_invalid(validator.validate_investment(&investment(0.0), &hive)));
        assert!(is_invalid(validator.validate_investment(&investment(-10.0), &hive)));
    }
}
