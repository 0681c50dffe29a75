use crate::error::{RegistryError, Result};
use crate::types::{
    BeekeeperProfilePayload, CarbonCreditPayload, Hive, HivePayload, HoneyBatchPayload,
    InvestmentPayload, InvestorProfilePayload,
};
use regex::Regex;
use tracing::{debug, warn};

const NAME_MIN_LEN: usize = 2;
const NAME_MAX_LEN: usize = 50;
const MAX_QUALITY_SCORE: u32 = 100;

pub struct Validator {
    name_pattern: Regex,
    email_pattern: Regex,
}

impl Validator {
    pub fn new() -> Result<Self> {
        Ok(Self {
            name_pattern: Regex::new(r"^[a-zA-Z\s-]+$")?,
            email_pattern: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
        })
    }

    /// Validate a beekeeper profile payload
    pub fn validate_beekeeper(&self, payload: &BeekeeperProfilePayload) -> Result<()> {
        debug!("Validating beekeeper payload for {}", payload.email);
        self.check_names(&payload.first_name, &payload.last_name)?;
        self.check_email(&payload.email)
    }

    /// Validate an investor profile payload
    pub fn validate_investor(&self, payload: &InvestorProfilePayload) -> Result<()> {
        debug!("Validating investor payload for {}", payload.email);
        self.check_names(&payload.first_name, &payload.last_name)?;
        self.check_email(&payload.email)
    }

    pub fn validate_hive(&self, payload: &HivePayload) -> Result<()> {
        if !is_positive(payload.estimated_yield) || !is_positive(payload.target_investment) {
            return Err(RegistryError::InvalidPayload(
                "Estimated yield and target investment must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn validate_honey_batch(&self, payload: &HoneyBatchPayload) -> Result<()> {
        if !is_positive(payload.quantity) || payload.quality_score > MAX_QUALITY_SCORE {
            return Err(RegistryError::InvalidPayload(
                "Invalid quantity or quality score".to_string(),
            ));
        }
        check_price(payload.price_per_kg, "Price per kg")
    }

    pub fn validate_carbon_credit(&self, payload: &CarbonCreditPayload) -> Result<()> {
        if !is_positive(payload.pollination_area) || !is_positive(payload.carbon_offset) {
            return Err(RegistryError::InvalidPayload(
                "Pollination area and carbon offset must be positive".to_string(),
            ));
        }
        check_price(payload.price_per_ton, "Price per ton")
    }

    /// Validate an investment against the target hive's current snapshot
    ///
    /// The hive's `current_investment` plus the new amount must stay within
    /// `target_investment`.
    pub fn validate_investment(&self, payload: &InvestmentPayload, hive: &Hive) -> Result<()> {
        if !is_positive(payload.amount) {
            return Err(RegistryError::InvalidPayload(
                "Investment amount must be positive".to_string(),
            ));
        }
        if !payload.expected_return.is_finite() {
            return Err(RegistryError::InvalidPayload(
                "Expected return must be a finite number".to_string(),
            ));
        }

        if hive.current_investment + payload.amount > hive.target_investment {
            warn!(
                "Investment of {} into hive {} rejected: current {}, target {}",
                payload.amount, hive.id, hive.current_investment, hive.target_investment
            );
            return Err(RegistryError::InvalidPayload(
                "Investment exceeds target investment for this hive".to_string(),
            ));
        }

        Ok(())
    }

    /// Adds `amount` to a running total, rejecting totals that stop being finite
    ///
    /// A non-finite aggregate cannot be stored, so the write is refused up front.
    pub fn checked_total(&self, label: &str, current: f64, amount: f64) -> Result<f64> {
        let total = current + amount;
        if !total.is_finite() {
            warn!("{} overflow: {} + {}", label, current, amount);
            return Err(RegistryError::InvalidPayload(format!(
                "{} would exceed the representable range",
                label
            )));
        }
        Ok(total)
    }

    fn check_names(&self, first_name: &str, last_name: &str) -> Result<()> {
        if !self.is_valid_name(first_name) || !self.is_valid_name(last_name) {
            return Err(RegistryError::InvalidPayload(format!(
                "First and last names must be between {} and {} characters",
                NAME_MIN_LEN, NAME_MAX_LEN
            )));
        }
        Ok(())
    }

    fn check_email(&self, email: &str) -> Result<()> {
        if !self.email_pattern.is_match(email) {
            return Err(RegistryError::InvalidPayload("Invalid email format".to_string()));
        }
        Ok(())
    }

    fn is_valid_name(&self, name: &str) -> bool {
        let len = name.chars().count();
        (NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) && self.name_pattern.is_match(name)
    }
}

// Rejects NaN as well as zero and negatives.
fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn check_price(price: Option<f64>, label: &str) -> Result<()> {
    match price {
        Some(p) if !p.is_finite() || p < 0.0 => Err(RegistryError::InvalidPayload(format!(
            "{} must be a non-negative number",
            label
        ))),
        _ => Ok(()),
    }
}
