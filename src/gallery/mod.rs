//! Image Gallery Module
//!
//! Serves the Commons image collection and filters it by taxon lineage and by
//! continent of occurrence.
//!
//! ## Filter Sources
//! - **Local**: taxon lineage from the harvested store, continent presence from
//!   the configured `ContinentResolver`.
//! - **Occurrence API**: a live species facet from the occurrence search; the
//!   continent is handed to the remote service instead of being checked locally.
//!
//! ## Submodules
//! - **`types`**: `ImageRecord` and the tabular result shapes it is decoded from.
//! - **`engine`**: `ImageFilterEngine` and `OccurrenceFacetFilter`.
//! - **`sparql`**: image loading and the language-availability lookup.
//! - **`handlers`**: HTTP handlers for the Axum web server.

pub mod engine;
pub mod handlers;
pub mod sparql;
pub mod types;
