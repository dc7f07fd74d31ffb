use crate::error::{Result, TaxaError};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// Integer-valued taxon key of the biodiversity data source, kept in its
/// string form because that is how it is keyed on disk and in image rows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SpeciesId(pub String);

impl SpeciesId {
    /// Validates a raw token. Empty or non-numeric tokens are rejected.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TaxaError::InvalidIdentifier(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SpeciesId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Enrichment facts for one species.
///
/// Every field defaults to empty: a sub-fetch that failed during harvesting
/// simply leaves its field unset, and older checkpoints may omit keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub localities: BTreeSet<String>,
    #[serde(default)]
    pub country_codes: BTreeSet<String>,
    /// Ancestor taxon keys in the order the remote service returned them.
    #[serde(default)]
    pub parents: Vec<u64>,
}

impl SpeciesRecord {
    pub fn has_parent(&self, taxon_key: u64) -> bool {
        self.parents.contains(&taxon_key)
    }
}
