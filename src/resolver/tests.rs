//! Resolver Module Tests
//!
//! ## Test Scopes
//! - **Basics**: the reference scenario, unknown species, "no filter".
//! - **Evidence**: country codes and substring keyword matches.
//! - **Strategies**: closure finds descendant evidence, flat does not; closure ⊇ flat.
//! - **Robustness**: cycles, self-references and deep chains terminate.

#[cfg(test)]
mod tests {
    use crate::resolver::index::ChildIndex;
    use crate::resolver::strategy::{
        ClosureResolver, ContinentResolver, FlatResolver, ResolutionStrategy, build_resolver,
    };
    use crate::taxonomy::store::TaxonomyStore;
    use crate::taxonomy::tables::{ContinentTable, GeoTables, KeywordTable};
    use crate::taxonomy::types::{SpeciesId, SpeciesRecord};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn record(countries: &[&str], localities: &[&str], parents: &[u64]) -> SpeciesRecord {
        SpeciesRecord {
            localities: localities.iter().map(|s| s.to_string()).collect(),
            country_codes: countries.iter().map(|s| s.to_string()).collect(),
            parents: parents.to_vec(),
        }
    }

    fn store(entries: Vec<(&str, SpeciesRecord)>) -> Arc<TaxonomyStore> {
        Arc::new(TaxonomyStore::from_records(
            entries
                .into_iter()
                .map(|(id, r)| (SpeciesId::parse(id).unwrap(), r)),
        ))
    }

    fn tables() -> Arc<GeoTables> {
        Arc::new(GeoTables::new(
            ContinentTable::from_map(HashMap::from([
                ("NA".to_string(), vec!["US", "CA", "MX"]),
                ("EU".to_string(), vec!["FR", "DE", "PT"]),
                ("AF".to_string(), vec!["KE", "CD"]),
            ])),
            KeywordTable::from_map(HashMap::from([
                ("AF".to_string(), vec!["Congo", "Sahara"]),
                ("EU".to_string(), vec!["Alps"]),
            ])),
        ))
    }

    /// Genus 100 has no data of its own; species 101 (France) and 102 (Congo basin) sit under it.
    fn genus_fixture() -> Arc<TaxonomyStore> {
        store(vec![
            ("1", record(&[], &[], &[])),
            ("100", record(&[], &[], &[1])),
            ("101", record(&["FR"], &[], &[1, 100])),
            ("102", record(&[], &["Congo River Basin"], &[1, 100])),
            ("200", record(&["US"], &["Swiss Alps (introduced)"], &[1])),
            ("300", record(&[], &[], &[1])),
        ])
    }

    fn both(s: Arc<TaxonomyStore>) -> (FlatResolver, ClosureResolver) {
        (
            FlatResolver::new(s.clone(), tables()),
            ClosureResolver::new(s, tables()),
        )
    }

    // ============================================================
    // BASICS
    // ============================================================

    #[test]
    fn test_reference_scenario() {
        let s = store(vec![("3", record(&["US"], &[], &[1, 2]))]);
        let t = Arc::new(GeoTables::new(
            ContinentTable::from_map(HashMap::from([(
                "NA".to_string(),
                vec!["US", "CA", "MX"],
            )])),
            KeywordTable::default(),
        ));

        for resolver in [
            build_resolver(ResolutionStrategy::Flat, s.clone(), t.clone()),
            build_resolver(ResolutionStrategy::Closure, s.clone(), t.clone()),
        ] {
            assert!(resolver.is_present("3", Some("NA")));
            assert!(!resolver.is_present("3", Some("EU")));
            assert!(resolver.is_present("3", None));
            assert!(!resolver.is_present("99", Some("NA")));
        }
    }

    #[test]
    fn test_unknown_species_absent_unless_no_filter() {
        let (flat, closure) = both(genus_fixture());
        for continent in ["NA", "EU", "AF", "XX"] {
            assert!(!flat.is_present("424242", Some(continent)));
            assert!(!closure.is_present("424242", Some(continent)));
        }
        assert!(flat.is_present("424242", None));
        assert!(closure.is_present("424242", Some("")));
    }

    #[test]
    fn test_strategy_tags() {
        let (flat, closure) = both(genus_fixture());
        assert_eq!(flat.strategy(), ResolutionStrategy::Flat);
        assert_eq!(closure.strategy(), ResolutionStrategy::Closure);
    }

    // ============================================================
    // EVIDENCE
    // ============================================================

    #[test]
    fn test_keyword_evidence_is_substring() {
        let (flat, _) = both(genus_fixture());
        assert!(flat.is_present("102", Some("AF")));
        // "Swiss Alps (introduced)" contains "Alps".
        assert!(flat.is_present("200", Some("EU")));
        assert!(flat.is_present("200", Some("NA")));
        assert!(!flat.is_present("200", Some("AF")));
    }

    #[test]
    fn test_unknown_continent_code_is_absent() {
        let (flat, closure) = both(genus_fixture());
        assert!(!flat.is_present("101", Some("ANTARCTICA")));
        assert!(!closure.is_present("100", Some("ANTARCTICA")));
    }

    // ============================================================
    // STRATEGIES
    // ============================================================

    #[test]
    fn test_closure_uses_descendant_evidence() {
        let (flat, closure) = both(genus_fixture());

        assert!(!flat.is_present("100", Some("EU")));
        assert!(closure.is_present("100", Some("EU")));
        assert!(closure.is_present("100", Some("AF")));
        assert!(!closure.is_present("100", Some("NA")));

        // Kingdom 1 reaches everything.
        assert!(closure.is_present("1", Some("NA")));
        // A leaf gains nothing from siblings.
        assert!(!closure.is_present("300", Some("EU")));
    }

    #[test]
    fn test_closure_is_superset_of_flat() {
        let s = genus_fixture();
        let (flat, closure) = both(s.clone());
        let species: Vec<String> = s.snapshot().into_keys().map(|k| k.0).collect();

        for id in species.iter().map(String::as_str).chain(["999"]) {
            for continent in [None, Some(""), Some("NA"), Some("EU"), Some("AF"), Some("OC")] {
                if flat.is_present(id, continent) {
                    assert!(
                        closure.is_present(id, continent),
                        "flat true but closure false for {id} / {continent:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_adding_matching_country_keeps_presence() {
        let s = store(vec![("5", record(&["KE", "US"], &[], &[]))]);
        let base = GeoTables::new(
            ContinentTable::from_map(HashMap::from([("AF".to_string(), vec!["KE"])])),
            KeywordTable::default(),
        );
        let widened = GeoTables::new(
            ContinentTable::from_map(HashMap::from([("AF".to_string(), vec!["KE", "US"])])),
            KeywordTable::default(),
        );

        let before = FlatResolver::new(s.clone(), Arc::new(base));
        let after = FlatResolver::new(s, Arc::new(widened));
        assert!(before.is_present("5", Some("AF")));
        assert!(after.is_present("5", Some("AF")));
    }

    // ============================================================
    // ROBUSTNESS
    // ============================================================

    #[test]
    fn test_closure_terminates_on_cycle() {
        let s = store(vec![
            ("10", record(&[], &[], &[20])),
            ("20", record(&[], &[], &[10])),
        ]);
        let closure = ClosureResolver::new(s, tables());

        assert!(!closure.is_present("10", Some("EU")));
        assert!(!closure.is_present("20", Some("EU")));
    }

    #[test]
    fn test_closure_finds_evidence_inside_cycle() {
        let s = store(vec![
            ("10", record(&[], &[], &[20])),
            ("20", record(&["DE"], &[], &[10])),
        ]);
        let closure = ClosureResolver::new(s, tables());
        assert!(closure.is_present("10", Some("EU")));
    }

    #[test]
    fn test_closure_handles_self_parent() {
        let s = store(vec![("7", record(&[], &[], &[7]))]);
        let closure = ClosureResolver::new(s, tables());
        assert!(!closure.is_present("7", Some("NA")));
    }

    #[test]
    fn test_closure_handles_deep_chain() {
        // 0 <- 1 <- 2 <- ... <- 19_999, evidence only at the bottom.
        let depth = 20_000u64;
        let mut entries = Vec::new();
        for i in 0..depth {
            let parents = if i == 0 { vec![] } else { vec![i - 1] };
            let countries: &[&str] = if i == depth - 1 { &["MX"] } else { &[] };
            entries.push((SpeciesId(i.to_string()), record(countries, &[], &parents)));
        }
        let s = Arc::new(TaxonomyStore::from_records(entries));
        let closure = ClosureResolver::new(s, tables());

        assert!(closure.is_present("0", Some("NA")));
        assert!(!closure.is_present("0", Some("EU")));
    }

    #[test]
    fn test_child_index_reverses_parent_links() {
        let index = ChildIndex::build(&genus_fixture());

        let under_genus: Vec<&str> = index.children_of("100").iter().map(|c| c.as_str()).collect();
        assert_eq!(under_genus, vec!["101", "102"]);
        assert_eq!(index.children_of("1").len(), 5);
        assert!(index.children_of("101").is_empty());
        assert_eq!(index.parent_count(), 2);
    }
}
