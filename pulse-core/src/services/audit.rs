//! services/audit.rs
//! Decision logbook for the classifier: every classification is appended to
//! `decisions.jsonl`; messages that fall through to the fallback category are
//! additionally recorded in `fallbacks.jsonl` for lexicon curation.
//!
//! Also owns the process-wide compiled lexicon: loaded through the verified
//! asset reader once, never mutated afterwards, shared freely across threads.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::commands::init::ensure_initialized_once;
use crate::config::{CoreConfig, PoliciesConfig};
use lexicon::assets::read_verified_or_embedded;
use lexicon::{CategoryLexicon, ClassificationResult, LexiconIndex};

// ----------- Lexicon lock -----------

static LEXICON_LOCKED: AtomicBool = AtomicBool::new(true);

/// Lock the on-disk lexicon to its embedded version.
pub fn lock_lexicon() {
    LEXICON_LOCKED.store(true, Ordering::SeqCst);
}

/// Allow local edits to the on-disk lexicon file.
pub fn unlock_lexicon() {
    LEXICON_LOCKED.store(false, Ordering::SeqCst);
}

// ----------- Public API -----------

/// A normalized record of a single classification, suitable for JSONL logging.
///
/// # Fields
/// - `timestamp` — When the classification finished.
/// - `lexicon` — Name of the lexicon file the index was built from.
/// - `input_preview` — Redacted preview of the classified message.
/// - `latency_ms` — End-to-end scoring latency in milliseconds.
/// - `result` — Exact JSON form of the classification result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRecord {
    pub timestamp: DateTime<Utc>,
    pub lexicon: String,
    pub input_preview: String,
    pub latency_ms: f64,
    pub result: Value,
}

/// Classify a message against the shared lexicon and log the decision.
///
/// # Arguments
/// * `message` - The raw feedback text.
///
/// # Returns
/// * `Ok(ClassificationResult)` — scoring itself is total; errors only come
///   from first-use lexicon loading/compilation.
///
/// # Side effects
/// * Appends a [`ClassificationRecord`] to `decisions.jsonl`.
/// * Appends a compact entry to `fallbacks.jsonl` when nothing matched.
pub fn evaluate_and_audit(message: &str) -> Result<ClassificationResult> {
    let index = shared_index()?;
    let t0 = std::time::Instant::now();
    let result = index.classify(message);
    let latency = t0.elapsed().as_secs_f64() * 1000.0;

    if audit_enabled() {
        let rec = ClassificationRecord {
            timestamp: Utc::now(),
            lexicon: lexicon_settings().default_lexicon.clone(),
            input_preview: redact_preview(message),
            latency_ms: latency,
            result: serde_json::to_value(&result)?,
        };
        append_jsonl(&log_paths().decisions, &rec);

        // Unmatched messages are the curation backlog: a growing fallback
        // stream means the lexicon is missing vocabulary.
        if result.matched_keywords.is_empty() && result.category == index.fallback() {
            let entry = json!({
                "timestamp": Utc::now().to_rfc3339(),
                "event": "fallback",
                "category": result.category,
                "input_preview": redact_preview(message),
                "word_count": result.detail.word_count,
            });
            append_jsonl(&log_paths().fallbacks, &entry);
        }
    }

    Ok(result)
}

/// Record a generic action event (lightweight telemetry).
///
/// # Arguments
/// * `agent` — Logical component name (e.g., `"commands"`, `"agent"`).
/// * `action` — Short verb label (e.g., `"classify_called"`).
/// * `details` — Arbitrary JSON payload (parameters, outcomes, etc.).
/// * `severity` — `"low" | "medium" | "high"` — for quick triage.
///
/// # Returns
/// Nothing. Appends a single JSON object to the aggregate logbook.
pub fn record_action(agent: &str, action: &str, details: &Value, severity: &str) {
    if !audit_enabled() {
        return;
    }
    let entry = json!({
        "timestamp": Utc::now().to_rfc3339(),
        "event": "action",
        "agent": agent,
        "action": action,
        "severity": severity,
        "details": details
    });
    append_jsonl(&log_paths().aggregate, &entry);
}

/// The compiled, process-wide lexicon index.
///
/// Built once on first use from the verified on-disk copy (or the embedded
/// canonical lexicon when the file is missing or drifted in locked mode).
/// Immutable afterwards, so concurrent classification needs no locking.
pub fn shared_index() -> Result<&'static LexiconIndex> {
    static CELL: OnceCell<LexiconIndex> = OnceCell::new();
    CELL.get_or_try_init(|| {
        let settings = lexicon_settings();
        let path = settings.dir.join(&settings.default_lexicon);
        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        // Unlocked either by config or by an explicit unlock_lexicon() call.
        let locked = settings.locked && LEXICON_LOCKED.load(Ordering::SeqCst);
        let text = read_verified_or_embedded(&path, file_name, locked)?;
        let parsed: CategoryLexicon = toml::from_str(text.as_ref())
            .with_context(|| format!("parsing lexicon {}", path.display()))?;
        LexiconIndex::compile(&parsed)
            .with_context(|| format!("compiling lexicon {}", path.display()))
    })
}

// ----------- Helpers -----------

/// Append a single JSON value as a line to a JSONL file.
///
/// Creates parent directories if missing; ignores write errors to avoid
/// failing the classification over telemetry.
fn append_jsonl<P: AsRef<std::path::Path>, S: Serialize>(path: P, val: &S) {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Ok(mut f) = fs::OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(val) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

/// Produce a privacy-safe preview of an input string for logging.
fn redact_preview(s: &str) -> String {
    let max_len = preview_len();
    let mut t: String = s.replace('\n', " ").chars().take(max_len).collect();
    if s.chars().count() > max_len {
        t.push('…');
    }
    t
}

fn log_paths() -> &'static LogPaths {
    static CELL: OnceCell<LogPaths> = OnceCell::new();
    CELL.get_or_init(|| match ensure_initialized_once() {
        Ok(report) => LogPaths::from_config(&report.config),
        Err(_) => LogPaths::default(),
    })
}

fn lexicon_settings() -> &'static LexiconSettings {
    static CELL: OnceCell<LexiconSettings> = OnceCell::new();
    CELL.get_or_init(|| match ensure_initialized_once() {
        Ok(report) => LexiconSettings::from_config(&report.config),
        Err(_) => LexiconSettings::default(),
    })
}

fn policies() -> &'static PoliciesConfig {
    static CELL: OnceCell<PoliciesConfig> = OnceCell::new();
    CELL.get_or_init(|| match ensure_initialized_once() {
        Ok(report) => report.config.policies.clone(),
        Err(_) => PoliciesConfig::default(),
    })
}

fn audit_enabled() -> bool {
    static CELL: OnceCell<bool> = OnceCell::new();
    *CELL.get_or_init(|| {
        ensure_initialized_once()
            .map(|report| report.config.services.audit_enabled)
            .unwrap_or(true)
    })
}

fn preview_len() -> usize {
    policies().log_preview_len
}

pub(crate) fn top_keywords_cap() -> usize {
    policies().top_keywords
}

#[derive(Clone)]
struct LogPaths {
    aggregate: PathBuf,
    decisions: PathBuf,
    fallbacks: PathBuf,
}

impl LogPaths {
    fn from_config(cfg: &CoreConfig) -> Self {
        Self {
            aggregate: cfg.logbook.aggregate.clone(),
            decisions: cfg.logbook.decisions.clone(),
            fallbacks: cfg.logbook.fallbacks.clone(),
        }
    }
}

impl Default for LogPaths {
    fn default() -> Self {
        let cfg = CoreConfig::default();
        Self::from_config(&cfg)
    }
}

#[derive(Clone)]
struct LexiconSettings {
    dir: PathBuf,
    default_lexicon: String,
    locked: bool,
}

impl LexiconSettings {
    fn from_config(cfg: &CoreConfig) -> Self {
        Self {
            dir: cfg.lexicon.path.clone(),
            default_lexicon: cfg.lexicon.default_lexicon.clone(),
            locked: cfg.lexicon.locked,
        }
    }
}

impl Default for LexiconSettings {
    fn default() -> Self {
        let cfg = CoreConfig::default();
        Self::from_config(&cfg)
    }
}
