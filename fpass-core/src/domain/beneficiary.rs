//! Beneficiary domain model

use serde::{Deserialize, Serialize};

use super::wire::deserialize_id;

/// A saved recipient owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub wallet_id: String,
}

impl Beneficiary {
    /// Case-insensitive substring match over name and tag
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .tag
                .as_deref()
                .is_some_and(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Filter beneficiaries by a search query; an empty query keeps everything
pub fn search<'a>(beneficiaries: &'a [Beneficiary], query: &str) -> Vec<&'a Beneficiary> {
    beneficiaries.iter().filter(|b| b.matches(query)).collect()
}

/// Body for creating or editing a beneficiary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BeneficiaryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub wallet_id: String,
}

impl BeneficiaryDraft {
    /// Validate draft data before it is sent
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.name.trim().is_empty() {
            return Err("beneficiary name cannot be empty");
        }
        if self.wallet_id.trim().is_empty() {
            return Err("wallet ID cannot be empty");
        }
        Ok(())
    }
}

impl From<&Beneficiary> for BeneficiaryDraft {
    fn from(b: &Beneficiary) -> Self {
        Self {
            name: b.name.clone(),
            tag: b.tag.clone(),
            wallet_id: b.wallet_id.clone(),
        }
    }
}
