//! Static geography tables.
//!
//! Both tables are keyed by continent code. Keyword matching is a
//! case-insensitive *substring* test, so "Congo" matches "Congo River Basin"
//! and also any other locality that merely contains the word.

use super::checkpoint::read_json;
use crate::error::Result;

use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Continent code → country codes.
#[derive(Debug, Clone, Default)]
pub struct ContinentTable {
    countries: HashMap<String, HashSet<String>>,
}

impl ContinentTable {
    pub fn from_map<I, S>(map: HashMap<String, I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let countries = map
            .into_iter()
            .map(|(continent, codes)| (continent, codes.into_iter().map(Into::into).collect()))
            .collect();
        Self { countries }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let map: HashMap<String, Vec<String>> = read_json(path)?;
        Ok(Self::from_map(map))
    }

    /// True if any of `codes` belongs to `continent`.
    pub fn contains_any<'a>(&self, continent: &str, codes: impl IntoIterator<Item = &'a String>) -> bool {
        match self.countries.get(continent) {
            Some(known) => codes.into_iter().any(|code| known.contains(code)),
            None => false,
        }
    }

    pub fn continents(&self) -> impl Iterator<Item = &str> {
        self.countries.keys().map(String::as_str)
    }
}

/// Continent code → locality keywords, stored lowercased.
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    keywords: HashMap<String, Vec<String>>,
}

impl KeywordTable {
    pub fn from_map<I, S>(map: HashMap<String, I>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keywords = map
            .into_iter()
            .map(|(continent, words)| {
                let lowered = words
                    .into_iter()
                    .map(|w| Into::<String>::into(w).to_lowercase())
                    .collect();
                (continent, lowered)
            })
            .collect();
        Self { keywords }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let map: HashMap<String, Vec<String>> = read_json(path)?;
        Ok(Self::from_map(map))
    }

    /// True if any locality contains any keyword of `continent`, ignoring case.
    pub fn matches_any<'a>(&self, continent: &str, localities: impl IntoIterator<Item = &'a String>) -> bool {
        let Some(words) = self.keywords.get(continent) else {
            return false;
        };
        localities.into_iter().any(|locality| {
            let lowered = locality.to_lowercase();
            words.iter().any(|word| lowered.contains(word.as_str()))
        })
    }
}

/// The two geography tables, loaded together and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct GeoTables {
    pub continents: ContinentTable,
    pub keywords: KeywordTable,
}

impl GeoTables {
    pub fn new(continents: ContinentTable, keywords: KeywordTable) -> Self {
        Self {
            continents,
            keywords,
        }
    }

    pub fn load(continents_path: &Path, keywords_path: &Path) -> Result<Self> {
        let continents = ContinentTable::load(continents_path)?;
        let keywords = KeywordTable::load(keywords_path)?;
        let mut names: Vec<&str> = continents.continents().collect();
        names.sort_unstable();
        tracing::info!("Loaded geography tables for continents {:?}", names);
        Ok(Self::new(continents, keywords))
    }
}
