use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// One Commons file depicting a taxon.
///
/// Decoded either from a flat JSON row or from a tabular query binding.
/// Numeric fields are accepted as numbers or strings and kept as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    #[serde(default)]
    pub file: String,
    /// Wikidata entity URL of the depicted taxon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon: Option<String>,
    /// Species identifier of the depicted taxon.
    #[serde(
        rename = "gbif_id",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub species_id: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxon_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_langs",
        skip_serializing_if = "Option::is_none"
    )]
    pub langs: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub bhl_page_id: Option<String>,
}

impl ImageRecord {
    /// Builds a record from one row of a tabular result.
    pub fn from_binding(row: &Binding) -> Self {
        let value = |field: &str| {
            row.get(field)
                .map(|term| term.value.clone())
                .filter(|v| !v.is_empty())
        };
        Self {
            file: value("file").unwrap_or_default(),
            taxon: value("taxon"),
            species_id: value("gbif_id"),
            url: value("url").unwrap_or_default(),
            taxon_name: value("taxon_name"),
            langs: row.get("langs").map(|term| split_langs(&term.value)),
            bhl_page_id: value("bhl_page_id"),
        }
    }

}

/// Wikidata QID from an entity URL, its last path segment.
pub fn entity_qid(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Comma-joined language list; an empty string means no languages.
pub fn split_langs(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Tabular result shapes ---

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BindingTerm {
    #[serde(default)]
    pub value: String,
}

pub type Binding = HashMap<String, BindingTerm>;

#[derive(Debug, Default, Deserialize)]
pub struct SelectResponse {
    #[serde(default)]
    pub results: SelectResults,
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectResults {
    #[serde(default)]
    pub bindings: Vec<Binding>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Object(map)) => map
            .get("value")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        _ => None,
    })
}

fn lenient_langs<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(split_langs(&s)),
        Some(serde_json::Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        ),
        _ => None,
    })
}
