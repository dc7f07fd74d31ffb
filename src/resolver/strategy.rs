use super::index::ChildIndex;
use crate::taxonomy::store::TaxonomyStore;
use crate::taxonomy::tables::GeoTables;
use crate::taxonomy::types::SpeciesRecord;

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;

/// Which resolution algorithm to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Own evidence only. Fast; misses species known only through descendants.
    #[default]
    Flat,
    /// Own evidence or any descendant's, transitively.
    Closure,
}

pub trait ContinentResolver: Send + Sync {
    /// `None` or an empty continent always yields `true`. A species with no
    /// record yields `false` for any real continent.
    fn is_present(&self, species_id: &str, continent: Option<&str>) -> bool;

    fn strategy(&self) -> ResolutionStrategy;
}

/// Builds the resolver for `strategy` over a fixed store snapshot.
pub fn build_resolver(
    strategy: ResolutionStrategy,
    store: Arc<TaxonomyStore>,
    tables: Arc<GeoTables>,
) -> Arc<dyn ContinentResolver> {
    match strategy {
        ResolutionStrategy::Flat => Arc::new(FlatResolver::new(store, tables)),
        ResolutionStrategy::Closure => Arc::new(ClosureResolver::new(store, tables)),
    }
}

fn requested(continent: Option<&str>) -> Option<&str> {
    continent.filter(|c| !c.is_empty())
}

fn has_direct_evidence(record: &SpeciesRecord, continent: &str, tables: &GeoTables) -> bool {
    tables
        .continents
        .contains_any(continent, &record.country_codes)
        || tables.keywords.matches_any(continent, &record.localities)
}

pub struct FlatResolver {
    store: Arc<TaxonomyStore>,
    tables: Arc<GeoTables>,
}

impl FlatResolver {
    pub fn new(store: Arc<TaxonomyStore>, tables: Arc<GeoTables>) -> Self {
        Self { store, tables }
    }
}

impl ContinentResolver for FlatResolver {
    fn is_present(&self, species_id: &str, continent: Option<&str>) -> bool {
        let Some(continent) = requested(continent) else {
            return true;
        };
        self.store
            .with_record(species_id, |record| {
                has_direct_evidence(record, continent, &self.tables)
            })
            .unwrap_or(false)
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::Flat
    }
}

/// Walks the descendants of a species through a prebuilt child index.
///
/// The walk is iterative with a visited set, so cyclic or very deep parent
/// graphs terminate without growing the call stack.
pub struct ClosureResolver {
    store: Arc<TaxonomyStore>,
    tables: Arc<GeoTables>,
    children: ChildIndex,
}

impl ClosureResolver {
    pub fn new(store: Arc<TaxonomyStore>, tables: Arc<GeoTables>) -> Self {
        let children = ChildIndex::build(&store);
        tracing::debug!(
            "Child index built for {} parent taxa over {} species",
            children.parent_count(),
            store.len()
        );
        Self {
            store,
            tables,
            children,
        }
    }
}

impl ContinentResolver for ClosureResolver {
    fn is_present(&self, species_id: &str, continent: Option<&str>) -> bool {
        let Some(continent) = requested(continent) else {
            return true;
        };
        if !self.store.contains(species_id) {
            return false;
        }

        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![species_id];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }

            let present = self
                .store
                .with_record(current, |record| {
                    has_direct_evidence(record, continent, &self.tables)
                })
                .unwrap_or(false);
            if present {
                return true;
            }

            for child in self.children.children_of(current) {
                if !visited.contains(child.as_str()) {
                    stack.push(child.as_str());
                }
            }
        }

        false
    }

    fn strategy(&self) -> ResolutionStrategy {
        ResolutionStrategy::Closure
    }
}
