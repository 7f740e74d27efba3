use std::collections::BTreeMap;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::normalize::for_matching;
use crate::types::CategoryLexicon;

// ----------------- Result -----------------

/// Outcome of classifying one message against a lexicon.
///
/// `matched_keywords` carries the winning category's trigger phrases in
/// their original (non-normalized) spelling, in lexicon order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub category: String,
    /// Winning category's share of the total accumulated score, in percent,
    /// rounded to two decimals. Always within `[0, 100]`.
    pub confidence: f64,
    pub matched_keywords: Vec<String>,
    pub detail: AnalysisDetail,
}

/// Per-call scoring detail: the full per-category score map plus raw
/// message measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisDetail {
    pub scores: BTreeMap<String, f64>,
    pub message_length: usize,
    pub word_count: usize,
}

// ----------------- Errors -----------------

/// Lexicon compilation failures. Classification itself is total and cannot
/// fail; only building the index can.
#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("trigger {phrase:?} in category {category:?} normalizes to nothing")]
    EmptyTrigger { category: String, phrase: String },
    #[error("trigger {phrase:?} produced an invalid pattern")]
    Pattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },
}

// ----------------- Index -----------------

struct IndexedTrigger {
    /// Original phrase, reported back in `matched_keywords`.
    phrase: String,
    /// Length weight: characters of the original phrase / 5. Longer, more
    /// specific phrases contribute more per occurrence.
    weight: f64,
    /// Whole-word pattern over the normalized phrase.
    pattern: Regex,
}

struct IndexedCategory {
    name: String,
    triggers: Vec<IndexedTrigger>,
}

/// A lexicon compiled for repeated classification: every trigger phrase is
/// normalized and turned into a word-boundary pattern once, up front.
///
/// The index is immutable after compilation, so a shared reference can be
/// used from any number of threads concurrently.
pub struct LexiconIndex {
    fallback: String,
    categories: Vec<IndexedCategory>,
}

impl LexiconIndex {
    /// Compile a lexicon into matchable form.
    ///
    /// Rejects trigger phrases that normalize to the empty string: a
    /// boundary pattern over nothing would match between every pair of
    /// words, which is never what a lexicon author meant.
    pub fn compile(lexicon: &CategoryLexicon) -> Result<Self, LexiconError> {
        let mut categories = Vec::with_capacity(lexicon.categories.len());
        for entry in &lexicon.categories {
            let mut triggers = Vec::with_capacity(entry.triggers.len());
            for phrase in &entry.triggers {
                let normalized = for_matching(phrase);
                if normalized.is_empty() {
                    return Err(LexiconError::EmptyTrigger {
                        category: entry.name.clone(),
                        phrase: phrase.clone(),
                    });
                }
                let pattern = Regex::new(&format!(r"\b{}\b", regex::escape(&normalized)))
                    .map_err(|source| LexiconError::Pattern {
                        phrase: phrase.clone(),
                        source,
                    })?;
                triggers.push(IndexedTrigger {
                    phrase: phrase.clone(),
                    weight: phrase.chars().count() as f64 / 5.0,
                    pattern,
                });
            }
            categories.push(IndexedCategory {
                name: entry.name.clone(),
                triggers,
            });
        }
        Ok(Self {
            fallback: lexicon.fallback.clone(),
            categories,
        })
    }

    /// The category reported when a message matches nothing.
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Classify a message: winning category, confidence share, matched
    /// trigger phrases, and the per-category score breakdown.
    ///
    /// Total over all inputs. Blank input and unmatched input both resolve
    /// to the fallback category with zero confidence.
    pub fn classify(&self, message: &str) -> ClassificationResult {
        if message.trim().is_empty() {
            return ClassificationResult {
                category: self.fallback.clone(),
                confidence: 0.0,
                matched_keywords: Vec::new(),
                detail: AnalysisDetail::default(),
            };
        }

        let normalized = for_matching(message);

        let mut scores: Vec<f64> = Vec::with_capacity(self.categories.len());
        let mut matched: Vec<Vec<String>> = Vec::with_capacity(self.categories.len());
        for category in &self.categories {
            let mut score = 0.0;
            let mut hits = Vec::new();
            for trigger in &category.triggers {
                let occurrences = trigger.pattern.find_iter(&normalized).count();
                if occurrences > 0 {
                    hits.push(trigger.phrase.clone());
                    score += occurrences as f64 * trigger.weight;
                }
            }
            scores.push(score);
            matched.push(hits);
        }

        let score_map: BTreeMap<String, f64> = self
            .categories
            .iter()
            .zip(&scores)
            .map(|(c, s)| (c.name.clone(), *s))
            .collect();
        let detail = AnalysisDetail {
            scores: score_map,
            message_length: message.chars().count(),
            word_count: message.split_whitespace().count(),
        };

        let total: f64 = scores.iter().sum();
        if total <= 0.0 {
            return ClassificationResult {
                category: self.fallback.clone(),
                confidence: 0.0,
                matched_keywords: Vec::new(),
                detail,
            };
        }

        // First category reaching the maximum wins: strict comparison keeps
        // the earliest index on ties, making declaration order the
        // tie-break.
        let mut winner = 0;
        for (idx, score) in scores.iter().enumerate() {
            if *score > scores[winner] {
                winner = idx;
            }
        }

        ClassificationResult {
            category: self.categories[winner].name.clone(),
            confidence: round2(scores[winner] / total * 100.0),
            matched_keywords: matched[winner].clone(),
            detail,
        }
    }

    /// Reduced entry point: the winning category only.
    ///
    /// Shares the full classification path, so it always agrees with
    /// [`classify`](Self::classify) on the winner.
    pub fn category_only(&self, message: &str) -> String {
        self.classify(message).category
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
