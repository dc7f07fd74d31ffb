//! Species Image Taxonomy Library
//!
//! This library crate defines the modules behind the `taxa-gallery` binary.
//! It harvests taxonomy data for the species depicted in an image collection,
//! then answers "which images belong to this taxon, on this continent" from
//! the harvested data.
//!
//! ## Architecture Modules
//!
//! - **`taxonomy`**: The local species store. Append-only records (localities,
//!   country codes, parent keys), the continent lookup tables, and the
//!   crash-safe JSON checkpoint.
//! - **`enrichment`**: The remote taxonomy client. Fetches distributions and
//!   parent lineage for one species, isolating failures per lookup.
//! - **`harvest`**: The resumable bulk pipeline. Deduplicates ids, skips
//!   known species, fetches with bounded concurrency and checkpoints.
//! - **`resolver`**: Continent presence per species, either from direct
//!   evidence only or from the species and all of its descendants.
//! - **`gallery`**: The image collection, the filter engine and the HTTP
//!   handlers that expose it.
//! - **`config`** and **`error`**: Runtime options and the crate error type.

pub mod config;
pub mod enrichment;
pub mod error;
pub mod gallery;
pub mod harvest;
pub mod resolver;
pub mod taxonomy;
