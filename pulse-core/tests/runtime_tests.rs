use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use pulse_core::commands::{ensure_initialized, ensure_initialized_once};
use pulse_core::config::CoreConfig;

fn test_root() -> &'static Path {
    static ROOT: OnceLock<PathBuf> = OnceLock::new();
    ROOT.get_or_init(|| {
        let ns = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid = std::process::id();
        let root = std::env::temp_dir().join(format!("pulse_runtime_{pid}_{ns}"));
        std::env::set_var("PULSE_ROOT", &root);
        root
    })
}

#[test]
fn init_seeds_the_root_layout() {
    let root = test_root();
    let report = ensure_initialized_once().expect("init");
    assert_eq!(report.root.as_path(), root);

    for rel in [
        "config.toml",
        "lexicons/civic.toml",
        "logbook.jsonl",
        "logbook/decisions.jsonl",
        "logbook/fallbacks.jsonl",
    ] {
        assert!(root.join(rel).exists(), "missing {rel}");
    }

    // The seeded lexicon is byte-identical to the embedded canonical copy.
    let seeded = std::fs::read_to_string(root.join("lexicons/civic.toml")).expect("read lexicon");
    assert_eq!(seeded, lexicon::assets::CIVIC_TOML);
}

#[test]
fn init_is_idempotent_and_loads_config() {
    test_root();
    let first = ensure_initialized_once().expect("init");
    let second = ensure_initialized_once().expect("init again");
    assert_eq!(first.root, second.root);

    assert_eq!(first.config.system.name, "pulse");
    assert_eq!(first.config.lexicon.default_lexicon, "civic.toml");
    assert!(first.config.lexicon.locked);
    assert_eq!(first.config.policies.top_keywords, 5);

    // Relative config paths are resolved against the root.
    assert!(first.config.logbook.decisions.starts_with(&first.root));
    assert!(first.config.lexicon.path.starts_with(&first.root));

    // A direct re-run reports the layout as already present.
    let rerun = ensure_initialized().expect("re-init");
    assert!(rerun.existed.iter().any(|e| e == "config.toml"));
    assert!(rerun.created.is_empty());
}

#[test]
fn config_defaults_apply_without_a_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = CoreConfig::load(dir.path()).expect("load");
    assert_eq!(cfg.system.name, "pulse");
    assert_eq!(cfg.policies.log_preview_len, 160);
    assert!(cfg.services.audit_enabled);
    assert_eq!(cfg.logbook.aggregate, dir.path().join("logbook.jsonl"));
}

#[test]
fn config_file_overrides_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(
        dir.path().join("config.toml"),
        r#"
[policies]
top_keywords = 3

[lexicon]
locked = false
"#,
    )
    .expect("write config");

    let cfg = CoreConfig::load(dir.path()).expect("load");
    assert_eq!(cfg.policies.top_keywords, 3);
    assert!(!cfg.lexicon.locked);
    // Untouched sections keep their defaults.
    assert_eq!(cfg.lexicon.default_lexicon, "civic.toml");
}
