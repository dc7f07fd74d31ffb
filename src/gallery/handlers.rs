use super::engine::{FilterParams, FilterSource, ImageFilterEngine, OccurrenceFacetFilter, TaxonMatch};
use super::sparql::{SparqlClient, parse_qids};
use super::types::ImageRecord;
use crate::error::TaxaError;
use crate::resolver::strategy::ResolutionStrategy;
use crate::taxonomy::store::TaxonomyStore;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Everything the HTTP handlers read. Built once at startup, shared read-only.
pub struct GalleryState {
    pub images: Vec<ImageRecord>,
    pub store: Arc<TaxonomyStore>,
    pub engine: ImageFilterEngine,
    pub facets: OccurrenceFacetFilter,
    pub sparql: SparqlClient,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LangParams {
    #[serde(default)]
    pub qids: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub species_records: usize,
    pub images: usize,
    pub strategy: ResolutionStrategy,
    pub taxon_match: TaxonMatch,
}

pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn reject(err: TaxaError) -> (StatusCode, Json<ErrorResponse>) {
    let status = err.status_code();
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    } else {
        tracing::debug!("Request rejected: {}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

pub async fn handle_images(
    Extension(state): Extension<Arc<GalleryState>>,
) -> ApiResult<Vec<ImageRecord>> {
    Ok(Json(state.images.clone()))
}

pub async fn handle_filter_images(
    Query(params): Query<FilterParams>,
    Extension(state): Extension<Arc<GalleryState>>,
) -> ApiResult<Vec<ImageRecord>> {
    let taxon_key = params.taxon_key.as_deref();
    let continent = params.continent.as_deref();

    let filtered = match params.source {
        FilterSource::Local => state.engine.filter(&state.images, taxon_key, continent),
        FilterSource::OccurrenceApi => {
            state
                .facets
                .filter(&state.images, taxon_key, continent)
                .await
        }
    };

    filtered.map(Json).map_err(reject)
}

pub async fn handle_wikidata_langs(
    Query(params): Query<LangParams>,
    Extension(state): Extension<Arc<GalleryState>>,
) -> ApiResult<HashMap<String, Vec<String>>> {
    let qids = parse_qids(params.qids.as_deref().unwrap_or_default()).map_err(reject)?;
    state
        .sparql
        .language_availability(&qids)
        .await
        .map(Json)
        .map_err(reject)
}

pub async fn handle_stats(Extension(state): Extension<Arc<GalleryState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        species_records: state.store.len(),
        images: state.images.len(),
        strategy: state.engine.resolver().strategy(),
        taxon_match: state.engine.taxon_match(),
    })
}
