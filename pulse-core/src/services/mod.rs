// src/services/mod.rs

pub mod audit;      // decision logbook + the shared compiled lexicon
pub mod classifier; // the triage entry points the ingestion layer calls

// Public API
pub use classifier::{category_only, classify, summarize, TriageSummary};
