//! Continent Resolution Module
//!
//! Decides whether a species is present on a continent, from the harvested
//! taxonomy store and the two geography tables.
//!
//! ## Evidence
//! - **Direct**: one of the species' country codes belongs to the continent.
//! - **Fuzzy**: one of its localities contains a continent keyword (case-insensitive substring).
//! - **Descendant** (closure strategy only): any taxon listing this species among its
//!   parents is itself present, transitively.
//!
//! An absent or empty continent code means "no filter" and always resolves to present.
//!
//! ## Submodules
//! - **`index`**: parent → children adjacency, built once per store snapshot.
//! - **`strategy`**: the `ContinentResolver` trait with its flat and closure implementations.

pub mod index;
pub mod strategy;

#[cfg(test)]
mod tests;
