//! services/classifier.rs
//! Rule-based category triage for citizen feedback messages, with unified
//! decision auditing.

use anyhow::Result;
use serde::Serialize;

use crate::services::audit::{evaluate_and_audit, top_keywords_cap};
use lexicon::ClassificationResult;

/// The slice of a classification that callers embed in their response
/// envelope and persist next to the stored message.
///
/// ## Fields
/// - `category` — winning category name (or the fallback)
/// - `confidence` — percent share of the total score, two decimals
/// - `top_keywords` — matched trigger phrases, trimmed to the configured cap
#[derive(Debug, Clone, Serialize)]
pub struct TriageSummary {
    pub category: String,
    pub confidence: f64,
    pub top_keywords: Vec<String>,
}

/// Classify a feedback message against the shared lexicon.
///
/// # Arguments
/// * `message` - The raw feedback text as submitted by the citizen.
///
/// # Returns
/// * `Ok(ClassificationResult)` with category, confidence, matched keywords
///   and the per-category score breakdown. Blank or unmatched input resolves
///   to the fallback category with zero confidence — that is an ordinary
///   outcome, not an error.
///
/// # Errors
/// * Only configuration faults: the lexicon file failing to parse or compile
///   on first use. Scoring itself is total over all string inputs.
///
/// # Side effects
/// * Appends a decision record to the logbook via
///   [`evaluate_and_audit`](crate::services::audit::evaluate_and_audit).
pub fn classify(message: &str) -> Result<ClassificationResult> {
    let result = evaluate_and_audit(message)?;
    tracing::debug!(
        category = %result.category,
        confidence = result.confidence,
        matches = result.matched_keywords.len(),
        "classified feedback message"
    );
    Ok(result)
}

/// Reduced entry point: the winning category label only.
///
/// Runs the same procedure as [`classify`] (and is audited the same way), so
/// it always agrees with `classify(message).category`.
pub fn category_only(message: &str) -> Result<String> {
    Ok(classify(message)?.category)
}

/// Project a full result down to the envelope the caller returns upstream.
pub fn summarize(result: &ClassificationResult) -> TriageSummary {
    TriageSummary {
        category: result.category.clone(),
        confidence: result.confidence,
        top_keywords: result
            .matched_keywords
            .iter()
            .take(top_keywords_cap())
            .cloned()
            .collect(),
    }
}
