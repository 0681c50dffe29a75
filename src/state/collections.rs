use crate::error::{RegistryError, Result};
use crate::types::{
    BeekeeperProfile, CarbonCredit, Hive, HoneyBatch, Investment, InvestorProfile,
};
use std::collections::BTreeMap;

/// The six record collections
///
/// Each collection is an ordered map from record id to record. Nothing here
/// enforces references between collections; that is the registry's job.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub beekeepers: BTreeMap<String, BeekeeperProfile>,
    pub investors: BTreeMap<String, InvestorProfile>,
    pub hives: BTreeMap<String, Hive>,
    pub honey_batches: BTreeMap<String, HoneyBatch>,
    pub carbon_credits: BTreeMap<String, CarbonCredit>,
    pub investments: BTreeMap<String, Investment>,
}

impl Collections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a single record
    pub fn apply(&mut self, write: Write) {
        match write {
            Write::Beekeeper(r) => {
                self.beekeepers.insert(r.id.clone(), r);
            }
            Write::Investor(r) => {
                self.investors.insert(r.id.clone(), r);
            }
            Write::Hive(r) => {
                self.hives.insert(r.id.clone(), r);
            }
            Write::HoneyBatch(r) => {
                self.honey_batches.insert(r.id.clone(), r);
            }
            Write::CarbonCredit(r) => {
                self.carbon_credits.insert(r.id.clone(), r);
            }
            Write::Investment(r) => {
                self.investments.insert(r.id.clone(), r);
            }
        }
    }

    /// Total number of records across all collections
    pub fn record_count(&self) -> usize {
        self.beekeepers.len()
            + self.investors.len()
            + self.hives.len()
            + self.honey_batches.len()
            + self.carbon_credits.len()
            + self.investments.len()
    }
}

/// A whole-record write destined for one collection
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    Beekeeper(BeekeeperProfile),
    Investor(InvestorProfile),
    Hive(Hive),
    HoneyBatch(HoneyBatch),
    CarbonCredit(CarbonCredit),
    Investment(Investment),
}

/// Ordered writes produced by one registry operation, committed together
pub type WriteSet = Vec<Write>;

impl Write {
    /// Name of the collection this write targets
    pub fn collection(&self) -> &'static str {
        match self {
            Write::Beekeeper(_) => "beekeepers",
            Write::Investor(_) => "investors",
            Write::Hive(_) => "hives",
            Write::HoneyBatch(_) => "honey_batches",
            Write::CarbonCredit(_) => "carbon_credits",
            Write::Investment(_) => "investments",
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Write::Beekeeper(r) => &r.id,
            Write::Investor(r) => &r.id,
            Write::Hive(r) => &r.id,
            Write::HoneyBatch(r) => &r.id,
            Write::CarbonCredit(r) => &r.id,
            Write::Investment(r) => &r.id,
        }
    }

    /// Encode the record body as JSON
    pub fn encode(&self) -> Result<String> {
        let body = match self {
            Write::Beekeeper(r) => serde_json::to_string(r)?,
            Write::Investor(r) => serde_json::to_string(r)?,
            Write::Hive(r) => serde_json::to_string(r)?,
            Write::HoneyBatch(r) => serde_json::to_string(r)?,
            Write::CarbonCredit(r) => serde_json::to_string(r)?,
            Write::Investment(r) => serde_json::to_string(r)?,
        };
        Ok(body)
    }

    /// Decode a stored record body for the named collection
    pub fn decode(collection: &str, body: &str) -> Result<Self> {
        let write = match collection {
            "beekeepers" => Write::Beekeeper(serde_json::from_str(body)?),
            "investors" => Write::Investor(serde_json::from_str(body)?),
            "hives" => Write::Hive(serde_json::from_str(body)?),
            "honey_batches" => Write::HoneyBatch(serde_json::from_str(body)?),
            "carbon_credits" => Write::CarbonCredit(serde_json::from_str(body)?),
            "investments" => Write::Investment(serde_json::from_str(body)?),
            other => {
                return Err(RegistryError::SystemError(format!(
                    "unknown collection '{}' in storage",
                    other
                )));
            }
        };
        Ok(write)
    }
}
