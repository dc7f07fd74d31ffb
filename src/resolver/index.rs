use crate::taxonomy::store::TaxonomyStore;
use crate::taxonomy::types::SpeciesId;

use std::collections::HashMap;

/// Reverse of the `parents` links: taxon key → species that list it as an ancestor.
#[derive(Debug, Default)]
pub struct ChildIndex {
    children: HashMap<String, Vec<SpeciesId>>,
}

impl ChildIndex {
    pub fn build(store: &TaxonomyStore) -> Self {
        let mut children: HashMap<String, Vec<SpeciesId>> = HashMap::new();
        for (species_id, parents) in store.parent_links() {
            for parent in parents {
                children
                    .entry(parent.to_string())
                    .or_default()
                    .push(species_id.clone());
            }
        }
        for list in children.values_mut() {
            list.sort();
            list.dedup();
        }
        Self { children }
    }

    pub fn children_of(&self, taxon: &str) -> &[SpeciesId] {
        self.children.get(taxon).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of taxa that have at least one child.
    pub fn parent_count(&self) -> usize {
        self.children.len()
    }
}
