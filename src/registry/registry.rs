//! Registry Operations
//!
//! Every create/list/query operation on the six collections lives here. These are
//! the only functions that keep counters, back-references and the per-hive
//! investment cap consistent.
//!
//! # Write Discipline
//! Mutating operations resolve and clone every record they touch, validate, and
//! only then hand a single `WriteSet` to the store. A rejected call therefore
//! leaves every collection exactly as it was.

use crate::{
    error::{RegistryError, Result},
    state::{Collections, Store, Write},
    types::*,
    validation::Validator,
};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

/// Initial reputation assigned to a new beekeeper
const STARTING_REPUTATION: u64 = 50;

/// The record registry
///
/// Generic over its backing store so the same operations run against the
/// in-memory store (tests, ephemeral deployments) and the SQLite store.
pub struct Registry<S> {
    store: S,
    validator: Validator,
}

impl<S: Store> Registry<S> {
    /// Creates a registry over an already-opened store
    pub fn new(store: S) -> Result<Self> {
        Ok(Self {
            store,
            validator: Validator::new()?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn collections(&self) -> &Collections {
        self.store.collections()
    }

    // ------------------------------------------------------------------
    // Profiles
    // ------------------------------------------------------------------

    /// Registers a beekeeper profile for the caller
    ///
    /// # Errors
    /// * `InvalidPayload` - bad name or email shape
    /// * `AlreadyExists` - caller already has a beekeeper profile, or the email is taken
    pub async fn create_beekeeper_profile(
        &mut self,
        caller: Caller,
        payload: BeekeeperProfilePayload,
    ) -> Result<BeekeeperProfile> {
        self.validator.validate_beekeeper(&payload)?;

        let beekeepers = &self.collections().beekeepers;
        if beekeepers.values().any(|b| b.owner == caller) {
            return Err(RegistryError::AlreadyExists(
                "Beekeeper profile already exists for this caller".to_string(),
            ));
        }
        if beekeepers.values().any(|b| same_email(&b.email, &payload.email)) {
            return Err(RegistryError::AlreadyExists(format!(
                "Beekeeper with email {} already exists",
                payload.email
            )));
        }

        let timestamp = now();
        let beekeeper = BeekeeperProfile {
            id: new_id(),
            owner: caller,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone_number: payload.phone_number,
            county: payload.county,
            location: payload.location,
            years_of_experience: payload.years_of_experience,
            total_hives: 0,
            total_batches: 0,
            total_honey_produced: 0.0,
            reputation_score: STARTING_REPUTATION,
            certifications: payload.certifications,
            status: BeekeeperStatus::PendingVerification,
            verified: false,
            hives: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        self.store.commit(vec![Write::Beekeeper(beekeeper.clone())]).await?;
        info!("Beekeeper {} registered for {:?}", beekeeper.id, caller);
        Ok(beekeeper)
    }

    /// Registers an investor profile for the caller
    ///
    /// # Errors
    /// * `InvalidPayload` - bad name or email shape
    /// * `AlreadyExists` - caller already has an investor profile, or the email is taken
    pub async fn create_investor_profile(
        &mut self,
        caller: Caller,
        payload: InvestorProfilePayload,
    ) -> Result<InvestorProfile> {
        self.validator.validate_investor(&payload)?;

        let investors = &self.collections().investors;
        if investors.values().any(|i| i.owner == caller) {
            return Err(RegistryError::AlreadyExists(
                "Investor profile already exists for this caller".to_string(),
            ));
        }
        if investors.values().any(|i| same_email(&i.email, &payload.email)) {
            return Err(RegistryError::AlreadyExists(format!(
                "Investor with email {} already exists",
                payload.email
            )));
        }

        let timestamp = now();
        let investor = InvestorProfile {
            id: new_id(),
            owner: caller,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            phone_number: payload.phone_number,
            location: payload.location,
            investor_type: payload.investor_type,
            status: InvestorStatus::PendingKyc,
            total_investments: 0,
            total_invested: 0.0,
            active_investments: 0,
            kyc_completed: false,
            investments: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };

        self.store.commit(vec![Write::Investor(investor.clone())]).await?;
        info!("Investor {} registered for {:?}", investor.id, caller);
        Ok(investor)
    }

    // ------------------------------------------------------------------
    // Hives and their children
    // ------------------------------------------------------------------

    /// Creates a hive owned by the caller's beekeeper profile
    ///
    /// Appends the hive to the beekeeper's `hives` and bumps `total_hives`.
    pub async fn create_hive(&mut self, caller: Caller, payload: HivePayload) -> Result<Hive> {
        let mut beekeeper = self.beekeeper_by_owner(caller)?.clone();
        self.validator.validate_hive(&payload)?;

        let timestamp = now();
        let hive = Hive {
            id: new_id(),
            beekeeper_id: beekeeper.id.clone(),
            beekeeper: caller,
            location: payload.location,
            installation_date: payload.installation_date,
            status: HiveStatus::Active,
            estimated_yield: payload.estimated_yield,
            current_investment: 0.0,
            target_investment: payload.target_investment,
            investors: Vec::new(),
            honey_batches: Vec::new(),
            carbon_credits: Vec::new(),
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
        };

        beekeeper.total_hives += 1;
        beekeeper.hives.push(hive.id.clone());
        beekeeper.updated_at = timestamp;

        self.store
            .commit(vec![Write::Hive(hive.clone()), Write::Beekeeper(beekeeper)])
            .await?;
        info!("Hive {} created by beekeeper {}", hive.id, hive.beekeeper_id);
        Ok(hive)
    }

    /// Records a honey batch harvested from one of the caller's hives
    ///
    /// Three records change together: the new batch, the hive's `honey_batches`,
    /// and the owning beekeeper's batch/production totals.
    pub async fn create_honey_batch(
        &mut self,
        caller: Caller,
        payload: HoneyBatchPayload,
    ) -> Result<HoneyBatch> {
        let mut hive = self.owned_hive(caller, &payload.hive_id, "batches")?.clone();
        self.validator.validate_honey_batch(&payload)?;
        let mut beekeeper = self.beekeeper_of(&hive)?.clone();
        let total_honey_produced = self.validator.checked_total(
            "Total honey produced",
            beekeeper.total_honey_produced,
            payload.quantity,
        )?;

        let timestamp = now();
        let batch = HoneyBatch {
            id: new_id(),
            hive_id: hive.id.clone(),
            beekeeper_id: hive.beekeeper_id.clone(),
            beekeeper: caller,
            harvest_date: payload.harvest_date,
            quantity: payload.quantity,
            quality: payload.quality,
            quality_score: payload.quality_score,
            location: payload.location,
            verification_status: VerificationStatus::Pending,
            verifier_id: None,
            nft_token_id: None,
            price_per_kg: payload.price_per_kg,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
        };

        hive.honey_batches.push(batch.id.clone());
        hive.updated_at = timestamp.clone();

        beekeeper.total_batches += 1;
        beekeeper.total_honey_produced = total_honey_produced;
        beekeeper.updated_at = timestamp;

        self.store
            .commit(vec![
                Write::HoneyBatch(batch.clone()),
                Write::Hive(hive),
                Write::Beekeeper(beekeeper),
            ])
            .await?;
        info!(
            "Honey batch {} ({} kg) recorded for hive {}",
            batch.id, batch.quantity, batch.hive_id
        );
        Ok(batch)
    }

    /// Issues a carbon credit against one of the caller's hives
    pub async fn create_carbon_credit(
        &mut self,
        caller: Caller,
        payload: CarbonCreditPayload,
    ) -> Result<CarbonCredit> {
        let mut hive = self.owned_hive(caller, &payload.hive_id, "carbon credits")?.clone();
        self.validator.validate_carbon_credit(&payload)?;

        let timestamp = now();
        let credit = CarbonCredit {
            id: new_id(),
            hive_id: hive.id.clone(),
            beekeeper_id: hive.beekeeper_id.clone(),
            beekeeper: caller,
            pollination_area: payload.pollination_area,
            carbon_offset: payload.carbon_offset,
            issue_date: payload.issue_date,
            expiry_date: payload.expiry_date,
            verification_status: VerificationStatus::Pending,
            verifier_id: None,
            nft_token_id: None,
            price_per_ton: payload.price_per_ton,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
        };

        hive.carbon_credits.push(credit.id.clone());
        hive.updated_at = timestamp;

        self.store
            .commit(vec![Write::CarbonCredit(credit.clone()), Write::Hive(hive)])
            .await?;
        info!("Carbon credit {} issued for hive {}", credit.id, credit.hive_id);
        Ok(credit)
    }

    // ------------------------------------------------------------------
    // Investments
    // ------------------------------------------------------------------

    /// Invests the caller's funds into a hive
    ///
    /// The cap check runs against the hive as currently stored, so
    /// `current_investment` never exceeds `target_investment`.
    pub async fn create_investment(
        &mut self,
        caller: Caller,
        payload: InvestmentPayload,
    ) -> Result<Investment> {
        let mut investor = self.investor_by_owner(caller)?.clone();
        let mut hive = self.hive(&payload.hive_id)?.clone();
        self.validator.validate_investment(&payload, &hive)?;
        let current_investment = self.validator.checked_total(
            "Hive investment",
            hive.current_investment,
            payload.amount,
        )?;
        let total_invested = self.validator.checked_total(
            "Total invested",
            investor.total_invested,
            payload.amount,
        )?;

        let timestamp = now();
        let investment = Investment {
            id: new_id(),
            investor_id: investor.id.clone(),
            investor: caller,
            hive_id: hive.id.clone(),
            beekeeper_id: hive.beekeeper_id.clone(),
            amount: payload.amount,
            investment_date: timestamp.clone(),
            expected_return: payload.expected_return,
            actual_return: None,
            status: InvestmentStatus::Active,
            maturity_date: payload.maturity_date,
            created_at: timestamp.clone(),
            updated_at: timestamp.clone(),
        };

        hive.current_investment = current_investment;
        hive.investors.push(investor.id.clone());
        hive.updated_at = timestamp.clone();

        investor.total_investments += 1;
        investor.active_investments += 1;
        investor.total_invested = total_invested;
        investor.investments.push(investment.id.clone());
        investor.updated_at = timestamp;

        debug!(
            "Hive {} investment {} -> {} of {}",
            hive.id,
            hive.current_investment - investment.amount,
            hive.current_investment,
            hive.target_investment
        );

        self.store
            .commit(vec![
                Write::Investment(investment.clone()),
                Write::Hive(hive),
                Write::Investor(investor),
            ])
            .await?;
        info!(
            "Investment {} of {} into hive {} by investor {}",
            investment.id, investment.amount, investment.hive_id, investment.investor_id
        );
        Ok(investment)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Beekeeper profile owned by the caller
    ///
    /// # Returns
    /// `NotFound` if the caller has not registered as a beekeeper
    pub fn get_beekeeper_profile_by_owner(&self, caller: Caller) -> Result<BeekeeperProfile> {
        self.beekeeper_by_owner(caller).cloned()
    }

    /// Investor profile owned by the caller
    ///
    /// # Returns
    /// `NotFound` if the caller has not registered as an investor
    pub fn get_investor_profile_by_owner(&self, caller: Caller) -> Result<InvestorProfile> {
        self.investor_by_owner(caller).cloned()
    }

    /// Beekeeper profile by id
    ///
    /// # Arguments
    /// * `id` - Beekeeper record id
    pub fn get_beekeeper_profile(&self, id: &str) -> Result<BeekeeperProfile> {
        self.collections()
            .beekeepers
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("Beekeeper with ID {} not found", id)))
    }

    /// Investor profile by id
    ///
    /// # Arguments
    /// * `id` - Investor record id
    pub fn get_investor_profile(&self, id: &str) -> Result<InvestorProfile> {
        self.collections()
            .investors
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("Investor with ID {} not found", id)))
    }

    /// Hive by id
    ///
    /// # Arguments
    /// * `id` - Hive record id
    pub fn get_hive(&self, id: &str) -> Result<Hive> {
        self.hive(id).cloned()
    }

    /// All beekeepers, in id order
    ///
    /// # Returns
    /// `NotFound` instead of an empty list
    pub fn list_beekeepers(&self) -> Result<Vec<BeekeeperProfile>> {
        non_empty(
            self.collections().beekeepers.values().cloned().collect(),
            "No beekeepers found in the system",
        )
    }

    /// All investors, in id order
    pub fn list_investors(&self) -> Result<Vec<InvestorProfile>> {
        non_empty(
            self.collections().investors.values().cloned().collect(),
            "No investors found in the system",
        )
    }

    /// All hives, in id order
    pub fn list_hives(&self) -> Result<Vec<Hive>> {
        non_empty(
            self.collections().hives.values().cloned().collect(),
            "No hives found in the system",
        )
    }

    /// All honey batches, in id order
    pub fn list_honey_batches(&self) -> Result<Vec<HoneyBatch>> {
        non_empty(
            self.collections().honey_batches.values().cloned().collect(),
            "No honey batches found",
        )
    }

    /// All carbon credits, in id order
    pub fn list_carbon_credits(&self) -> Result<Vec<CarbonCredit>> {
        non_empty(
            self.collections().carbon_credits.values().cloned().collect(),
            "No carbon credits found",
        )
    }

    /// All investments, in id order
    pub fn list_investments(&self) -> Result<Vec<Investment>> {
        non_empty(
            self.collections().investments.values().cloned().collect(),
            "No investments found",
        )
    }

    /// Hives whose recorded owner is the caller
    pub fn get_my_hives(&self, caller: Caller) -> Result<Vec<Hive>> {
        non_empty(
            self.collections()
                .hives
                .values()
                .filter(|h| h.beekeeper == caller)
                .cloned()
                .collect(),
            "No hives found for this beekeeper",
        )
    }

    /// Investments made by the caller
    pub fn get_my_investments(&self, caller: Caller) -> Result<Vec<Investment>> {
        non_empty(
            self.collections()
                .investments
                .values()
                .filter(|i| i.investor == caller)
                .cloned()
                .collect(),
            "No investments found for this investor",
        )
    }

    /// Batches of one hive, in the order the hive recorded them
    pub fn get_hive_honey_batches(&self, hive_id: &str) -> Result<Vec<HoneyBatch>> {
        let hive = self.hive(hive_id)?;
        let batches = &self.collections().honey_batches;

        let mut result = Vec::with_capacity(hive.honey_batches.len());
        for batch_id in &hive.honey_batches {
            let batch = batches.get(batch_id).ok_or_else(|| {
                RegistryError::SystemError(format!(
                    "Hive {} references missing honey batch {}",
                    hive.id, batch_id
                ))
            })?;
            result.push(batch.clone());
        }

        non_empty(result, "No honey batches found for this hive")
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    fn beekeeper_by_owner(&self, caller: Caller) -> Result<&BeekeeperProfile> {
        self.collections()
            .beekeepers
            .values()
            .find(|b| b.owner == caller)
            .ok_or_else(|| {
                RegistryError::NotFound(
                    "Beekeeper profile not found. Please create a profile first.".to_string(),
                )
            })
    }

    fn investor_by_owner(&self, caller: Caller) -> Result<&InvestorProfile> {
        self.collections()
            .investors
            .values()
            .find(|i| i.owner == caller)
            .ok_or_else(|| {
                RegistryError::NotFound(
                    "Investor profile not found. Please create a profile first.".to_string(),
                )
            })
    }

    fn hive(&self, id: &str) -> Result<&Hive> {
        self.collections()
            .hives
            .get(id)
            .ok_or_else(|| RegistryError::NotFound(format!("Hive with ID {} not found", id)))
    }

    /// Resolves a hive and checks the caller owns it
    fn owned_hive(&self, caller: Caller, hive_id: &str, what: &str) -> Result<&Hive> {
        let hive = self.hive(hive_id)?;
        if hive.beekeeper != caller {
            return Err(RegistryError::Unauthorized(format!(
                "You can only create {} for your own hives",
                what
            )));
        }
        Ok(hive)
    }

    // A hive pointing at a missing beekeeper is a broken back-reference.
    fn beekeeper_of(&self, hive: &Hive) -> Result<&BeekeeperProfile> {
        self.collections()
            .beekeepers
            .get(&hive.beekeeper_id)
            .ok_or_else(|| {
                RegistryError::SystemError(format!(
                    "Hive {} references missing beekeeper {}",
                    hive.id, hive.beekeeper_id
                ))
            })
    }
}

/// Emails compare case-insensitively, with full Unicode case folding
fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn non_empty<T>(items: Vec<T>, message: &str) -> Result<Vec<T>> {
    if items.is_empty() {
        return Err(RegistryError::NotFound(message.to_string()));
    }
    Ok(items)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current instant as an ISO-8601 UTC string with millisecond precision
fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
