use super::types::{SpeciesId, SpeciesRecord};

use dashmap::DashMap;
use std::collections::BTreeMap;

/// In-memory taxonomy index keyed by species id.
///
/// The store is append-only: once a species has a record it is never replaced,
/// so re-harvesting an id is a no-op. Reads may happen from any number of
/// threads; the harvester is the only writer.
#[derive(Debug, Default)]
pub struct TaxonomyStore {
    records: DashMap<SpeciesId, SpeciesRecord>,
}

impl TaxonomyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = (SpeciesId, SpeciesRecord)>) -> Self {
        let store = Self::new();
        for (id, record) in records {
            store.records.insert(id, record);
        }
        store
    }

    pub fn contains(&self, species_id: &str) -> bool {
        self.records.contains_key(species_id)
    }

    pub fn get(&self, species_id: &str) -> Option<SpeciesRecord> {
        self.records.get(species_id).map(|entry| entry.value().clone())
    }

    /// Runs `f` against the record without cloning it.
    pub fn with_record<R>(&self, species_id: &str, f: impl FnOnce(&SpeciesRecord) -> R) -> Option<R> {
        self.records.get(species_id).map(|entry| f(entry.value()))
    }

    /// Inserts the record unless the id is already present.
    /// Returns `true` when the record was stored.
    pub fn insert_if_absent(&self, species_id: SpeciesId, record: SpeciesRecord) -> bool {
        match self.records.entry(species_id) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(record);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All `(id, parents)` pairs, used to build the child index.
    pub fn parent_links(&self) -> Vec<(SpeciesId, Vec<u64>)> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().parents.clone()))
            .collect()
    }

    /// Ordered copy of the whole store, the shape written to the checkpoint.
    pub fn snapshot(&self) -> BTreeMap<SpeciesId, SpeciesRecord> {
        self.records
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }
}
