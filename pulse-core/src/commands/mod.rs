// src/commands/mod.rs
use anyhow::Result;
use serde_json::json;

use crate::services::audit::record_action;
use crate::services::classifier::{self, TriageSummary};
use lexicon::ClassificationResult;

pub mod init;

pub use init::{ensure_initialized, ensure_initialized_once, InitReport};

/// Facade over the classification services: one handle an embedding caller
/// (HTTP layer, CLI agent) constructs once and calls per request.
pub struct Commands;

impl Commands {
    /// Initialize the runtime (root layout, config, lexicon, logbook) and
    /// return a handle. Idempotent across calls and threads.
    pub fn new() -> Result<Self> {
        ensure_initialized_once()?;
        Ok(Self)
    }

    /// Full classification: category, confidence, matched keywords, detail.
    pub fn classify(&self, message: &str) -> Result<ClassificationResult> {
        let result = classifier::classify(message)?;
        record_action(
            "commands",
            "classify_called",
            &json!({
                "category": result.category,
                "confidence": result.confidence,
                "matches": result.matched_keywords.len(),
            }),
            "low",
        );
        Ok(result)
    }

    /// Category label only, for callers that persist nothing else.
    pub fn category_only(&self, message: &str) -> Result<String> {
        let category = classifier::category_only(message)?;
        record_action(
            "commands",
            "category_only_called",
            &json!({ "category": category }),
            "low",
        );
        Ok(category)
    }

    /// The response-envelope slice of a result (top-N keywords applied).
    pub fn summarize(&self, result: &ClassificationResult) -> TriageSummary {
        classifier::summarize(result)
    }
}
