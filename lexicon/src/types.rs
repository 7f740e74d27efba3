use serde::{Deserialize, Serialize};

/// A category lexicon: the fixed mapping from category names to trigger
/// phrases, plus the fallback category used when nothing matches.
///
/// Declaration order of `categories` is the scoring order. Ties between
/// equal accumulated scores resolve to the category declared first, so the
/// order in the TOML file is part of the classifier's contract.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryLexicon {
    pub name: String,
    pub version: String,
    pub description: Option<String>,
    pub fallback: String,
    pub categories: Vec<CategoryEntry>,
}

/// One category and its trigger phrases, in declaration order.
///
/// Phrases may repeat, within a category or across categories; every entry
/// is matched and scored independently.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CategoryEntry {
    pub name: String,
    #[serde(default)]
    pub triggers: Vec<String>,
}
