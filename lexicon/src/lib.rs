// Public modules so pulse-core can use them
pub mod assets;
pub mod evaluator;
pub mod normalize;
pub mod types;

pub use assets::{default_lexicon_text, write_default_lexicons};
pub use evaluator::{AnalysisDetail, ClassificationResult, LexiconError, LexiconIndex};
pub use normalize::for_matching as normalize_for_matching;
pub use types::{CategoryEntry, CategoryLexicon};

use anyhow::{Context, Result};
use std::path::Path;

/// Parse a lexicon from a TOML file on disk.
pub fn load_lexicon_from_file(path: impl AsRef<Path>) -> Result<CategoryLexicon> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading lexicon file {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing lexicon file {}", path.display()))
}

/// --- One-shot API for callers that hold a lexicon as TOML text ---
///
/// Compiles the lexicon and classifies a single message. Callers with more
/// than one message to classify should compile a [`LexiconIndex`] once and
/// reuse it.
pub fn classify_with_toml(toml_lexicon: &str, message: &str) -> Result<ClassificationResult> {
    let lexicon: CategoryLexicon =
        toml::from_str(toml_lexicon).context("parsing lexicon TOML")?;
    let index = LexiconIndex::compile(&lexicon).context("compiling lexicon")?;
    Ok(index.classify(message))
}

/// Same one-shot path for callers that hold the lexicon as JSON.
pub fn classify_with_json(json_lexicon: &str, message: &str) -> Result<ClassificationResult> {
    let lexicon: CategoryLexicon =
        serde_json::from_str(json_lexicon).context("parsing lexicon JSON")?;
    let index = LexiconIndex::compile(&lexicon).context("compiling lexicon")?;
    Ok(index.classify(message))
}
