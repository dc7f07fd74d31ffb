//! Taxonomy Index Module
//!
//! Holds the harvested enrichment data for every species that appears in the
//! image collection, plus the two static geography tables used to answer
//! "is this species present on that continent?".
//!
//! ## Core Concepts
//! - **Species Record**: country codes, free-text localities and the ancestor chain of one species.
//! - **Store**: an append-only map from species id to record. Written by the harvester only.
//! - **Checkpoint**: the JSON snapshot of the store on disk, replaced atomically on every write.
//! - **Tables**: continent → country codes and continent → locality keywords, loaded once.

pub mod checkpoint;
pub mod store;
pub mod tables;
pub mod types;
