//! Enrichment Module Tests
//!
//! The HTTP client is exercised against an in-process axum server standing in
//! for the remote taxonomy service.
//!
//! ## Test Scopes
//! - **Protocol**: Folding raw rows into deduplicated sets and key lists.
//! - **Client**: Query parameters, error classification, timeouts.
//! - **Fetcher**: Per-lookup failure isolation.

#[cfg(test)]
mod tests {
    use crate::enrichment::client::{ClientConfig, GbifClient};
    use crate::enrichment::fetcher::{EnrichmentFetcher, SpeciesEnricher, TaxonomySource};
    use crate::enrichment::protocol::{DistributionPage, ParentEntry, parent_keys};
    use crate::error::{Result, TaxaError};
    use crate::taxonomy::types::SpeciesId;

    use async_trait::async_trait;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::time::Duration;

    async fn spawn_fake_api(router: Router) -> GbifClient {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        GbifClient::new(&ClientConfig {
            base_url: format!("http://{}", addr),
            request_timeout: Duration::from_millis(500),
        })
    }

    async fn distributions_ok(
        Path(_id): Path<String>,
        Query(params): Query<HashMap<String, String>>,
    ) -> (StatusCode, Json<Value>) {
        if params.get("limit").map(String::as_str) != Some("1000") {
            return (StatusCode::BAD_REQUEST, Json(json!({})));
        }
        (
            StatusCode::OK,
            Json(json!({
                "results": [
                    {"locality": "Ontario", "country": "CA"},
                    {"locality": "Ontario", "country": "CA"},
                    {"locality": null, "country": "US"},
                    {"country": ""},
                    {"locality": "Baja California"}
                ]
            })),
        )
    }

    async fn parents_ok(Path(_id): Path<String>) -> Json<Value> {
        Json(json!([
            {"key": 1, "scientificName": "Animalia"},
            {"scientificName": "no key here"},
            {"key": 44}
        ]))
    }

    async fn server_error() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn not_json() -> &'static str {
        "<html>maintenance</html>"
    }

    fn id(raw: &str) -> SpeciesId {
        SpeciesId::parse(raw).unwrap()
    }

    // ============================================================
    // PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_distribution_page_into_sets_deduplicates() {
        let page: DistributionPage = serde_json::from_value(json!({
            "results": [
                {"locality": "Kenya", "country": "KE"},
                {"locality": "Kenya", "country": "KE"},
                {"locality": "", "country": null}
            ]
        }))
        .unwrap();

        let (localities, countries) = page.into_sets();
        assert_eq!(localities.len(), 1);
        assert_eq!(countries.len(), 1);
    }

    #[test]
    fn test_distribution_page_without_results_is_empty() {
        let page: DistributionPage = serde_json::from_value(json!({"offset": 0})).unwrap();
        let (localities, countries) = page.into_sets();
        assert!(localities.is_empty() && countries.is_empty());
    }

    #[test]
    fn test_parent_keys_keeps_order_and_skips_missing() {
        let entries: Vec<ParentEntry> =
            serde_json::from_value(json!([{"key": 9}, {}, {"key": 3}])).unwrap();
        assert_eq!(parent_keys(entries), vec![9, 3]);
    }

    // ============================================================
    // CLIENT TESTS
    // ============================================================

    #[tokio::test]
    async fn test_client_classifies_http_failure_as_remote_unavailable() {
        let client =
            spawn_fake_api(Router::new().route("/species/:id/parents", get(server_error))).await;

        let err = client.parents(&id("5")).await.unwrap_err();
        assert!(matches!(err, TaxaError::RemoteUnavailable { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_client_classifies_bad_body_as_malformed() {
        let client = spawn_fake_api(Router::new().route("/species/:id/parents", get(not_json))).await;

        let err = client.parents(&id("5")).await.unwrap_err();
        assert!(matches!(err, TaxaError::MalformedResponse { .. }), "{err}");
    }

    #[tokio::test]
    async fn test_client_times_out_stalled_requests() {
        let client = spawn_fake_api(Router::new().route(
            "/species/:id/parents",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!([]))
            }),
        ))
        .await;

        let err = client.parents(&id("5")).await.unwrap_err();
        assert!(matches!(err, TaxaError::RemoteUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_client_species_facets_passes_parameters() {
        let client = spawn_fake_api(Router::new().route(
            "/occurrence/search",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                assert_eq!(params.get("taxonKey").map(String::as_str), Some("212"));
                assert_eq!(params.get("limit").map(String::as_str), Some("0"));
                assert_eq!(params.get("facet").map(String::as_str), Some("speciesKey"));
                assert_eq!(params.get("facetMincount").map(String::as_str), Some("10"));
                assert_eq!(params.get("facetLimit").map(String::as_str), Some("5000"));
                let continent = params.get("continent").cloned().unwrap_or_default();
                Json(json!({
                    "count": 0,
                    "facets": [{
                        "field": "SPECIES_KEY",
                        "counts": [
                            {"name": "7", "count": 120},
                            {"name": 11, "count": 15},
                            {"name": continent, "count": 10}
                        ]
                    }]
                }))
            }),
        ))
        .await;

        let keys = client.species_facets(212, Some("EUROPE")).await.unwrap();
        assert_eq!(keys, vec!["7".to_string(), "11".to_string(), "EUROPE".to_string()]);
    }

    #[tokio::test]
    async fn test_client_species_facets_without_facets_is_empty() {
        let client = spawn_fake_api(Router::new().route(
            "/occurrence/search",
            get(|| async { Json(json!({"count": 0, "facets": []})) }),
        ))
        .await;

        assert!(client.species_facets(1, None).await.unwrap().is_empty());
    }

    // ============================================================
    // FETCHER TESTS
    // ============================================================

    #[tokio::test]
    async fn test_fetch_builds_full_record() {
        let client = spawn_fake_api(
            Router::new()
                .route("/species/:id/distributions", get(distributions_ok))
                .route("/species/:id/parents", get(parents_ok)),
        )
        .await;
        let fetcher = SpeciesEnricher::new(client);

        let record = fetcher.fetch("2435099").await.unwrap();

        assert_eq!(record.localities.len(), 2);
        assert!(record.localities.contains("Baja California"));
        assert_eq!(record.country_codes.len(), 2);
        assert!(record.country_codes.contains("US"));
        assert_eq!(record.parents, vec![1, 44]);
    }

    #[tokio::test]
    async fn test_fetch_isolates_distribution_failure() {
        let client = spawn_fake_api(
            Router::new()
                .route("/species/:id/distributions", get(server_error))
                .route("/species/:id/parents", get(parents_ok)),
        )
        .await;
        let fetcher = SpeciesEnricher::new(client);

        let record = fetcher.fetch("5").await.unwrap();
        assert!(record.localities.is_empty());
        assert!(record.country_codes.is_empty());
        assert_eq!(record.parents, vec![1, 44]);
    }

    #[tokio::test]
    async fn test_fetch_isolates_malformed_parents() {
        let client = spawn_fake_api(
            Router::new()
                .route("/species/:id/distributions", get(distributions_ok))
                .route("/species/:id/parents", get(not_json)),
        )
        .await;
        let fetcher = SpeciesEnricher::new(client);

        let record = fetcher.fetch("5").await.unwrap();
        assert!(record.parents.is_empty());
        assert!(record.country_codes.contains("CA"));
    }

    struct DownSource;

    #[async_trait]
    impl TaxonomySource for DownSource {
        async fn distributions(&self, species_id: &SpeciesId) -> Result<DistributionPage> {
            Err(TaxaError::RemoteUnavailable {
                url: format!("stub://{}", species_id),
                reason: "connection refused".to_string(),
            })
        }

        async fn parents(&self, species_id: &SpeciesId) -> Result<Vec<ParentEntry>> {
            Err(TaxaError::RemoteUnavailable {
                url: format!("stub://{}", species_id),
                reason: "connection refused".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_fetch_with_both_lookups_down_yields_empty_record() {
        let fetcher = SpeciesEnricher::new(DownSource);
        let record = fetcher.fetch("5").await.unwrap();
        assert_eq!(record, Default::default());
    }

    #[tokio::test]
    async fn test_fetch_rejects_empty_identifier() {
        let fetcher = SpeciesEnricher::new(DownSource);
        let err = fetcher.fetch("").await.unwrap_err();
        assert!(matches!(err, TaxaError::InvalidIdentifier(_)));
    }
}
