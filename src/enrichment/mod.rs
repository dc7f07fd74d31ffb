//! Enrichment Module
//!
//! Pulls the taxonomic and geographic facts for a single species from the
//! remote taxonomy service.
//!
//! ## Workflow
//! 1. **Distributions**: up to one page (1000 rows) of `(locality, country)` pairs,
//!    folded into two deduplicated sets.
//! 2. **Parents**: the ancestor chain, reduced to the ancestor keys.
//! 3. **Isolation**: each lookup fails on its own; the failed field stays empty
//!    and the error is logged, never retried here.
//!
//! ## Submodules
//! - **`protocol`**: Endpoint paths, constants and wire DTOs of the remote service.
//! - **`client`**: The HTTP client (`GbifClient`) with per-call timeouts.
//! - **`fetcher`**: The `EnrichmentFetcher` contract and its implementation.

pub mod client;
pub mod fetcher;
pub mod protocol;

#[cfg(test)]
mod tests;
