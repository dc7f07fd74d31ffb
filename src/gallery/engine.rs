use super::types::ImageRecord;
use crate::enrichment::client::GbifClient;
use crate::error::{Result, TaxaError};
use crate::resolver::strategy::ContinentResolver;
use crate::taxonomy::store::TaxonomyStore;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Taxon key meaning "no taxon filter".
pub const ALL_TAXA: &str = "ALL";

/// Whether a taxon filter also keeps images of the taxon itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaxonMatch {
    /// Only species that list the taxon among their parents.
    Descendants,
    /// Descendants plus the taxon's own images.
    #[default]
    DescendantsAndSelf,
}

/// Where filtering decisions come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterSource {
    #[default]
    Local,
    OccurrenceApi,
}

/// Query parameters of a filter request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    #[serde(rename = "taxonKey", default)]
    pub taxon_key: Option<String>,
    #[serde(default)]
    pub continent: Option<String>,
    /// Also accepted as `dataSource`, the name the gallery front end sends.
    #[serde(default, alias = "dataSource")]
    pub source: FilterSource,
}

/// Parses the taxon filter. `None`, empty and `ALL` disable it.
pub fn parse_taxon_key(raw: Option<&str>) -> Result<Option<u64>> {
    match raw.map(str::trim) {
        None | Some("") | Some(ALL_TAXA) => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| TaxaError::BadFilterValue {
                field: "taxonKey",
                value: value.to_string(),
            }),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Stable filter over the local taxonomy index.
pub struct ImageFilterEngine {
    store: Arc<TaxonomyStore>,
    resolver: Arc<dyn ContinentResolver>,
    taxon_match: TaxonMatch,
}

impl ImageFilterEngine {
    pub fn new(
        store: Arc<TaxonomyStore>,
        resolver: Arc<dyn ContinentResolver>,
        taxon_match: TaxonMatch,
    ) -> Self {
        Self {
            store,
            resolver,
            taxon_match,
        }
    }

    pub fn resolver(&self) -> &dyn ContinentResolver {
        self.resolver.as_ref()
    }

    pub fn taxon_match(&self) -> TaxonMatch {
        self.taxon_match
    }

    /// Keeps images matching both the taxon and the continent filter, in input order.
    ///
    /// A non-numeric taxon key, or a non-numeric species id met while applying
    /// a taxon filter, fails the whole request with `BadFilterValue`.
    pub fn filter(
        &self,
        images: &[ImageRecord],
        taxon_key: Option<&str>,
        continent: Option<&str>,
    ) -> Result<Vec<ImageRecord>> {
        let taxon = parse_taxon_key(taxon_key)?;
        let continent = non_empty(continent);

        let mut kept = Vec::new();
        for image in images {
            let species = non_empty(image.species_id.as_deref());

            if let Some(taxon) = taxon
                && !self.matches_taxon(species, taxon)?
            {
                continue;
            }

            if let Some(continent) = continent
                && !self.resolver.is_present(species.unwrap_or_default(), Some(continent))
            {
                continue;
            }

            kept.push(image.clone());
        }

        tracing::debug!(
            "Filtered {} -> {} images (taxon={:?}, continent={:?})",
            images.len(),
            kept.len(),
            taxon,
            continent
        );
        Ok(kept)
    }

    fn matches_taxon(&self, species: Option<&str>, taxon: u64) -> Result<bool> {
        let Some(species) = species else {
            return Ok(false);
        };
        let species_key: u64 = species.parse().map_err(|_| TaxaError::BadFilterValue {
            field: "gbif_id",
            value: species.to_string(),
        })?;

        if self.taxon_match == TaxonMatch::DescendantsAndSelf && species_key == taxon {
            return Ok(true);
        }
        Ok(self
            .store
            .with_record(species, |record| record.has_parent(taxon))
            .unwrap_or(false))
    }
}

/// Filter backed by the live occurrence facet instead of the local index.
pub struct OccurrenceFacetFilter {
    client: GbifClient,
}

impl OccurrenceFacetFilter {
    pub fn new(client: GbifClient) -> Self {
        Self { client }
    }

    /// Keeps images whose species appears in the facet for `taxon_key`.
    /// The continent only narrows the remote query.
    pub async fn filter(
        &self,
        images: &[ImageRecord],
        taxon_key: Option<&str>,
        continent: Option<&str>,
    ) -> Result<Vec<ImageRecord>> {
        let taxon = parse_taxon_key(taxon_key)?.ok_or_else(|| TaxaError::BadFilterValue {
            field: "taxonKey",
            value: taxon_key.unwrap_or_default().to_string(),
        })?;

        let keys: HashSet<String> = self
            .client
            .species_facets(taxon, non_empty(continent))
            .await?
            .into_iter()
            .collect();

        tracing::debug!("Occurrence facet for taxon {} has {} species", taxon, keys.len());

        Ok(images
            .iter()
            .filter(|image| {
                non_empty(image.species_id.as_deref())
                    .map(|species| keys.contains(species))
                    .unwrap_or(false)
            })
            .cloned()
            .collect())
    }
}
