//! Which bugs the hooks act on.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct RelevanceConfig {
    /// Bugzilla classifications (e.g., `oVirt`).
    #[serde(default, deserialize_with = "list_or_csv")]
    pub classifications: Vec<String>,

    /// Bugzilla products accepted regardless of classification.
    #[serde(default, deserialize_with = "list_or_csv")]
    pub products: Vec<String>,
}

impl RelevanceConfig {
    pub fn is_configured(&self) -> bool {
        !self.classifications.is_empty() || !self.products.is_empty()
    }
}

/// Accepts `["oVirt", "Fedora"]` as well as `"oVirt,Fedora"`, which is how a
/// list arrives through an environment variable.
fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
    }

    let items = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(raw) => raw.split(',').map(str::to_string).collect(),
    };
    Ok(items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect())
}
