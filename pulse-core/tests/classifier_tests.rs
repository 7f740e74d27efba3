use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use pulse_core::commands::Commands;

// All tests in this binary share one isolated root; PULSE_ROOT must be set
// before anything touches the runtime, so it happens inside the OnceLock.
fn test_root() -> &'static Path {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let root = std::env::temp_dir().join(format!("pulse_classifier_{pid}_{ns}"));
        std::env::set_var("PULSE_ROOT", &root);
        root
    })
}

fn log_lines(rel: &str) -> Vec<String> {
    let path = test_root().join(rel);
    std::fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn classify_appends_a_decision_record() {
    let root = test_root();
    let commands = Commands::new().expect("runtime init");

    let result = commands
        .classify("Cadde üzerinde derin çukurlar var, yol bozuk.")
        .expect("classify");
    assert_eq!(result.category, "Trafik");
    assert!(root.join("logbook/decisions.jsonl").exists());

    let lines = log_lines("logbook/decisions.jsonl");
    assert!(
        lines.iter().any(|l| l.contains("\"Trafik\"") && l.contains("input_preview")),
        "no decision record for the traffic message"
    );
}

#[test]
fn unmatched_message_lands_in_fallback_stream() {
    test_root();
    let commands = Commands::new().expect("runtime init");

    let result = commands
        .classify("lorem ipsum dolor sit amet")
        .expect("classify");
    assert_eq!(result.category, "Öneri");
    assert_eq!(result.confidence, 0.0);

    let lines = log_lines("logbook/fallbacks.jsonl");
    assert!(
        lines.iter().any(|l| l.contains("\"fallback\"") && l.contains("lorem ipsum")),
        "fallback stream missing the unmatched message"
    );
}

#[test]
fn summary_trims_keywords_to_policy_cap() {
    test_root();
    let commands = Commands::new().expect("runtime init");

    let result = commands
        .classify("internet wifi kesik kopuk fiber adsl modem")
        .expect("classify");
    assert_eq!(result.category, "Bağlantı");
    assert!(result.matched_keywords.len() > 5);

    let summary = commands.summarize(&result);
    assert_eq!(summary.category, result.category);
    assert_eq!(summary.confidence, result.confidence);
    assert_eq!(summary.top_keywords.len(), 5);
    assert_eq!(summary.top_keywords, result.matched_keywords[..5].to_vec());
}

#[test]
fn category_only_agrees_with_full_classification() {
    test_root();
    let commands = Commands::new().expect("runtime init");

    for message in [
        "İnternet çok yavaş, wifi bağlantısı sürekli kopuyor.",
        "Parkta çöpler toplanmıyor, çok kirli.",
        "Yeni bir bisiklet yolu yapılabilir mi?",
        "",
    ] {
        let full = commands.classify(message).expect("classify");
        let label = commands.category_only(message).expect("category_only");
        assert_eq!(label, full.category, "entry points disagree for {message:?}");
    }
}

#[test]
fn service_agrees_with_pure_evaluation() {
    test_root();
    let commands = Commands::new().expect("runtime init");

    let message = "Hava çok kirli, egzoz dumanı çok fazla.";
    let via_service = commands.classify(message).expect("classify");
    let via_pure =
        lexicon::classify_with_toml(lexicon::assets::CIVIC_TOML, message).expect("pure classify");
    assert_eq!(via_service, via_pure);
}
