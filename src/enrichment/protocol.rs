//! Remote Taxonomy Service Protocol
//!
//! Paths and response shapes of the biodiversity API. The service is treated
//! as untrusted: every field may be missing, so everything is optional and
//! defaults to empty.

use serde::Deserialize;
use std::collections::BTreeSet;

// --- API Endpoints ---

/// Distribution facts for one species: `/species/{id}/distributions`.
pub fn distributions_path(species_id: &str) -> String {
    format!("/species/{}/distributions", species_id)
}

/// Ancestor chain for one species: `/species/{id}/parents`.
pub fn parents_path(species_id: &str) -> String {
    format!("/species/{}/parents", species_id)
}

/// Occurrence search, used with `limit=0` for facet counts only.
pub const ENDPOINT_OCCURRENCE_SEARCH: &str = "/occurrence/search";

// --- Limits ---

/// Single page of distributions; no further pagination.
pub const DISTRIBUTION_PAGE_LIMIT: usize = 1000;
/// Number of species facet values requested from the occurrence search.
pub const FACET_LIMIT: usize = 5000;
/// Species with fewer occurrences than this are left out of the facet.
pub const FACET_MIN_COUNT: u64 = 10;

// --- Data Transfer Objects ---

#[derive(Debug, Default, Deserialize)]
pub struct DistributionPage {
    #[serde(default)]
    pub results: Vec<DistributionEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DistributionEntry {
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
}

impl DistributionPage {
    /// Deduplicated `(localities, country_codes)`, skipping absent and blank values.
    pub fn into_sets(self) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut localities = BTreeSet::new();
        let mut country_codes = BTreeSet::new();
        for entry in self.results {
            if let Some(locality) = entry.locality.filter(|l| !l.is_empty()) {
                localities.insert(locality);
            }
            if let Some(country) = entry.country.filter(|c| !c.is_empty()) {
                country_codes.insert(country);
            }
        }
        (localities, country_codes)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ParentEntry {
    #[serde(default)]
    pub key: Option<u64>,
}

/// Ancestor keys in response order; entries without a key are dropped.
pub fn parent_keys(entries: Vec<ParentEntry>) -> Vec<u64> {
    entries.into_iter().filter_map(|entry| entry.key).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct OccurrenceSearchResponse {
    #[serde(default)]
    pub facets: Vec<Facet>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Facet {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub counts: Vec<FacetCount>,
}

#[derive(Debug, Deserialize)]
pub struct FacetCount {
    pub name: serde_json::Value,
    #[serde(default)]
    pub count: u64,
}

impl FacetCount {
    /// The facet value as a species key string. Numbers and strings are both accepted.
    pub fn species_key(&self) -> Option<String> {
        match &self.name {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl OccurrenceSearchResponse {
    /// Species keys of the first facet. No facets means no species.
    pub fn species_keys(&self) -> Vec<String> {
        self.facets
            .first()
            .map(|facet| facet.counts.iter().filter_map(FacetCount::species_key).collect())
            .unwrap_or_default()
    }
}
