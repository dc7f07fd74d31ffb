use super::client::GbifClient;
use super::protocol::{DistributionPage, ParentEntry, parent_keys};
use crate::error::Result;
use crate::taxonomy::types::{SpeciesId, SpeciesRecord};

use async_trait::async_trait;

/// The two remote lookups an enrichment needs.
#[async_trait]
pub trait TaxonomySource: Send + Sync {
    async fn distributions(&self, species_id: &SpeciesId) -> Result<DistributionPage>;
    async fn parents(&self, species_id: &SpeciesId) -> Result<Vec<ParentEntry>>;
}

#[async_trait]
impl TaxonomySource for GbifClient {
    async fn distributions(&self, species_id: &SpeciesId) -> Result<DistributionPage> {
        GbifClient::distributions(self, species_id).await
    }

    async fn parents(&self, species_id: &SpeciesId) -> Result<Vec<ParentEntry>> {
        GbifClient::parents(self, species_id).await
    }
}

/// Builds one store record for one species.
#[async_trait]
pub trait EnrichmentFetcher: Send + Sync {
    /// Fails only with `InvalidIdentifier`. Remote failures are absorbed
    /// into empty fields.
    async fn fetch(&self, species_id: &str) -> Result<SpeciesRecord>;
}

/// `EnrichmentFetcher` over any `TaxonomySource`.
pub struct SpeciesEnricher<S> {
    source: S,
}

impl<S: TaxonomySource> SpeciesEnricher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

#[async_trait]
impl<S: TaxonomySource> EnrichmentFetcher for SpeciesEnricher<S> {
    async fn fetch(&self, species_id: &str) -> Result<SpeciesRecord> {
        let id = SpeciesId::parse(species_id)?;

        let (distributions, parents) =
            tokio::join!(self.source.distributions(&id), self.source.parents(&id));

        let mut record = SpeciesRecord::default();

        match distributions {
            Ok(page) => {
                let (localities, country_codes) = page.into_sets();
                record.localities = localities;
                record.country_codes = country_codes;
            }
            Err(e) => {
                tracing::warn!("Distribution lookup failed for species {}: {}", id, e);
            }
        }

        match parents {
            Ok(entries) => record.parents = parent_keys(entries),
            Err(e) => {
                tracing::warn!("Parent lookup failed for species {}: {}", id, e);
            }
        }

        Ok(record)
    }
}
