use super::protocol::*;
use crate::error::{Result, TaxaError};
use crate::taxonomy::types::SpeciesId;

use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings for the remote taxonomy service.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Upper bound for a single request, connect to last byte.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.gbif.org/v1".to_string(),
            request_timeout: Duration::from_secs(20),
        }
    }
}

/// HTTP client for the biodiversity API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GbifClient {
    http: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl GbifClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout: config.request_timeout,
        }
    }

    pub async fn distributions(&self, species_id: &SpeciesId) -> Result<DistributionPage> {
        let limit = DISTRIBUTION_PAGE_LIMIT.to_string();
        self.get_json(
            &distributions_path(species_id.as_str()),
            &[("limit", limit.as_str())],
        )
        .await
    }

    pub async fn parents(&self, species_id: &SpeciesId) -> Result<Vec<ParentEntry>> {
        self.get_json(&parents_path(species_id.as_str()), &[]).await
    }

    /// Species keys with at least `FACET_MIN_COUNT` occurrences under `taxon_key`,
    /// optionally restricted to a continent by the remote service.
    pub async fn species_facets(&self, taxon_key: u64, continent: Option<&str>) -> Result<Vec<String>> {
        let taxon_key = taxon_key.to_string();
        let facet_limit = FACET_LIMIT.to_string();
        let facet_min = FACET_MIN_COUNT.to_string();
        let mut params = vec![
            ("taxonKey", taxon_key.as_str()),
            ("limit", "0"),
            ("facet", "speciesKey"),
            ("facetMincount", facet_min.as_str()),
            ("facetLimit", facet_limit.as_str()),
        ];
        if let Some(continent) = continent {
            params.push(("continent", continent));
        }

        let response: OccurrenceSearchResponse =
            self.get_json(ENDPOINT_OCCURRENCE_SEARCH, &params).await?;
        Ok(response.species_keys())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> Result<T> {
        let raw_url = format!("{}{}", self.base_url, path);
        let parsed = if params.is_empty() {
            reqwest::Url::parse(&raw_url)
        } else {
            reqwest::Url::parse_with_params(&raw_url, params)
        };
        let url = parsed.map_err(|e| TaxaError::RemoteUnavailable {
            url: raw_url.clone(),
            reason: e.to_string(),
        })?;

        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .timeout(self.request_timeout)
            .send()
            .await
            .map_err(|e| TaxaError::RemoteUnavailable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(TaxaError::RemoteUnavailable {
                url: url.to_string(),
                reason: format!("HTTP {}", response.status()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TaxaError::RemoteUnavailable {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        serde_json::from_slice(&body).map_err(|e| TaxaError::MalformedResponse {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
