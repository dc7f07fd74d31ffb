//! Image Source & Triple-Store Client
//!
//! The image collection is read either from a local JSON file or from a
//! triple-store endpoint whose full query URL is supplied by configuration.
//! The language lookup builds its own small `VALUES` query from validated QIDs.

use super::types::{Binding, ImageRecord, SelectResponse, entity_qid, split_langs};
use crate::error::{Result, TaxaError};
use crate::taxonomy::checkpoint::read_json;

use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

static QID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Q\d+$").expect("QID pattern is valid"));

/// Wikipedia editions checked for language availability.
pub const WIKI_LANGUAGES: [&str; 4] = ["en", "fr", "pt", "es"];

/// Where the image collection comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// A JSON array of flat image rows.
    File(PathBuf),
    /// A client whose endpoint is a complete query URL returning tabular bindings.
    Endpoint(SparqlClient),
}

impl ImageSource {
    pub async fn load(&self) -> Result<Vec<ImageRecord>> {
        let images = match self {
            ImageSource::File(path) => read_json::<Vec<ImageRecord>>(path)?,
            ImageSource::Endpoint(client) => client
                .select_configured()
                .await?
                .iter()
                .map(ImageRecord::from_binding)
                .collect(),
        };
        tracing::info!("Loaded {} images", images.len());
        Ok(images)
    }
}

/// Client for the tabular query service.
#[derive(Debug, Clone)]
pub struct SparqlClient {
    http: reqwest::Client,
    endpoint: String,
    request_timeout: Duration,
}

impl SparqlClient {
    pub fn new(endpoint: impl Into<String>, request_timeout: Duration) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            request_timeout,
        }
    }

    /// Languages (among `WIKI_LANGUAGES`) with a Wikipedia article for each QID.
    /// QIDs without any article are absent from the result.
    pub async fn language_availability(&self, qids: &[String]) -> Result<HashMap<String, Vec<String>>> {
        let query = language_query(qids);
        let request = self.http.get(self.endpoint.as_str()).query(&[("query", query.as_str())]);
        let rows = self.get_bindings(request, &self.endpoint).await?;

        let mut languages = HashMap::new();
        for row in rows {
            let Some(taxon) = row.get("taxon").map(|t| t.value.as_str()) else {
                continue;
            };
            let Some(qid) = entity_qid(taxon) else {
                continue;
            };
            let langs = row
                .get("langs")
                .map(|t| split_langs(&t.value))
                .unwrap_or_default();
            languages.insert(qid.to_string(), langs);
        }
        Ok(languages)
    }

    /// Runs the endpoint URL as configured, without adding a query.
    pub async fn select_configured(&self) -> Result<Vec<Binding>> {
        self.get_bindings(self.http.get(self.endpoint.as_str()), &self.endpoint)
            .await
    }

    async fn get_bindings(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<Vec<Binding>> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/sparql-results+json")
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
        let parsed: SelectResponse =
            serde_json::from_slice(&body).map_err(|e| TaxaError::MalformedResponse {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(parsed.results.bindings)
    }
}

/// Splits a comma-separated QID list and keeps the well-formed ones.
/// Fails when nothing valid remains.
pub fn parse_qids(raw: &str) -> Result<Vec<String>> {
    let qids: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|qid| QID_PATTERN.is_match(qid))
        .map(str::to_string)
        .collect();
    if qids.is_empty() {
        return Err(TaxaError::BadFilterValue {
            field: "qids",
            value: raw.to_string(),
        });
    }
    Ok(qids)
}

/// Query text for the language lookup. `qids` must already be validated.
pub fn language_query(qids: &[String]) -> String {
    let values = qids
        .iter()
        .map(|qid| format!("wd:{}", qid))
        .collect::<Vec<_>>()
        .join(" ");
    let languages = WIKI_LANGUAGES
        .iter()
        .map(|lang| format!("\"{}\"", lang))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"PREFIX schema: <http://schema.org/>
PREFIX wd: <http://www.wikidata.org/entity/>
PREFIX wikibase: <http://wikiba.se/ontology#>
SELECT ?taxon (GROUP_CONCAT(?lang; separator=",") AS ?langs)
WHERE {{
  VALUES ?taxon {{ {values} }}
  ?article schema:about ?taxon ;
           schema:inLanguage ?lang ;
           schema:isPartOf [ wikibase:wikiGroup "wikipedia" ].
  FILTER(?lang in ({languages}))
}}
GROUP BY ?taxon"#
    )
}
