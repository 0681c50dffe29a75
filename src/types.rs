use ethers::types::Address;
use serde::{Deserialize, Serialize};

/// Identity of the party making a request, supplied by the hosting environment.
pub type Caller = Address;

/// Beekeeper account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeekeeperStatus {
    Active,
    Inactive,
    Suspended,
    PendingVerification,
}

/// Investor account status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestorStatus {
    Active,
    Inactive,
    Suspended,
    PendingKyc,
}

/// Operational status of a hive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HiveStatus {
    Active,
    Inactive,
    Maintenance,
}

/// Quality grade of a honey batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchQuality {
    Premium,
    Standard,
    Organic,
}

/// Third-party verification state of a batch or carbon credit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Lifecycle of an investment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvestmentStatus {
    Active,
    Completed,
    Withdrawn,
    Pending,
}

/// Beekeeper profile
///
/// `total_hives`, `total_batches` and `total_honey_produced` are maintained by the
/// registry as hives and batches are created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeekeeperProfile {
    pub id: String,
    pub owner: Caller,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub county: String,
    pub location: String,
    pub years_of_experience: u64,
    pub total_hives: u64,
    pub total_batches: u64,
    /// In kg
    pub total_honey_produced: f64,
    /// 0-100
    pub reputation_score: u64,
    pub certifications: Vec<String>,
    pub status: BeekeeperStatus,
    pub verified: bool,
    pub hives: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Investor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfile {
    pub id: String,
    pub owner: Caller,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub location: String,
    /// "Individual", "Institution", "Fund"
    pub investor_type: String,
    pub status: InvestorStatus,
    pub total_investments: u64,
    pub total_invested: f64,
    pub active_investments: u64,
    pub kyc_completed: bool,
    pub investments: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Hive record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hive {
    pub id: String,
    pub beekeeper_id: String,
    pub beekeeper: Caller,
    pub location: String,
    pub installation_date: String,
    pub status: HiveStatus,
    pub estimated_yield: f64,
    /// Sum of all accepted investment amounts, never above `target_investment`
    pub current_investment: f64,
    pub target_investment: f64,
    /// Investor ids, one entry per investment made
    pub investors: Vec<String>,
    pub honey_batches: Vec<String>,
    pub carbon_credits: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Honey batch record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneyBatch {
    pub id: String,
    pub hive_id: String,
    pub beekeeper_id: String,
    pub beekeeper: Caller,
    pub harvest_date: String,
    /// In kg
    pub quantity: f64,
    pub quality: BatchQuality,
    /// 0-100
    pub quality_score: u32,
    pub location: String,
    pub verification_status: VerificationStatus,
    pub verifier_id: Option<String>,
    pub nft_token_id: Option<String>,
    pub price_per_kg: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Carbon credit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonCredit {
    pub id: String,
    pub hive_id: String,
    pub beekeeper_id: String,
    pub beekeeper: Caller,
    /// In hectares
    pub pollination_area: f64,
    /// In tons of CO2
    pub carbon_offset: f64,
    pub issue_date: String,
    pub expiry_date: String,
    pub verification_status: VerificationStatus,
    pub verifier_id: Option<String>,
    pub nft_token_id: Option<String>,
    pub price_per_ton: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Investment record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub investor_id: String,
    pub investor: Caller,
    pub hive_id: String,
    pub beekeeper_id: String,
    pub amount: f64,
    pub investment_date: String,
    /// Percentage
    pub expected_return: f64,
    pub actual_return: Option<f64>,
    pub status: InvestmentStatus,
    pub maturity_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

// Request payloads. Identity and timestamps never come from the caller.

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeekeeperProfilePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub county: String,
    pub location: String,
    pub years_of_experience: u64,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestorProfilePayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub location: String,
    pub investor_type: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HivePayload {
    pub location: String,
    pub installation_date: String,
    pub estimated_yield: f64,
    pub target_investment: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneyBatchPayload {
    pub hive_id: String,
    pub harvest_date: String,
    pub quantity: f64,
    pub quality: BatchQuality,
    pub quality_score: u32,
    pub location: String,
    #[serde(default)]
    pub price_per_kg: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonCreditPayload {
    pub hive_id: String,
    pub pollination_area: f64,
    pub carbon_offset: f64,
    pub issue_date: String,
    pub expiry_date: String,
    #[serde(default)]
    pub price_per_ton: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentPayload {
    pub hive_id: String,
    pub amount: f64,
    pub expected_return: f64,
    #[serde(default)]
    pub maturity_date: Option<String>,
}
