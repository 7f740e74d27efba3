use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing;

#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub logbook: LogbookConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub policies: PoliciesConfig,
}

impl CoreConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join("config.toml");
        let mut cfg = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            toml::from_str::<CoreConfig>(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        } else {
            tracing::info!(
                "No config file found at {}. Using CoreConfig::default().",
                path.display()
            );
            CoreConfig::default()
        };
        cfg.resolve_paths(root);
        Ok(cfg)
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.lexicon.path = absolutize(root, &self.lexicon.path);
        self.logbook.path = absolutize(root, &self.logbook.path);
        self.logbook.aggregate = absolutize(root, &self.logbook.aggregate);
        self.logbook.decisions = absolutize(root, &self.logbook.decisions);
        self.logbook.fallbacks = absolutize(root, &self.logbook.fallbacks);
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            lexicon: LexiconConfig::default(),
            logbook: LogbookConfig::default(),
            services: ServicesConfig::default(),
            policies: PoliciesConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "SystemConfig::default_name")]
    pub name: String,
    #[serde(default = "SystemConfig::default_version")]
    pub version: String,
}

impl SystemConfig {
    fn default_name() -> String {
        "pulse".to_string()
    }

    fn default_version() -> String {
        "0.1.0".to_string()
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
            version: Self::default_version(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LexiconConfig {
    #[serde(default = "LexiconConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LexiconConfig::default_lexicon")]
    pub default_lexicon: String,
    #[serde(default = "LexiconConfig::default_locked")]
    pub locked: bool,
}

impl LexiconConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("lexicons")
    }

    fn default_lexicon() -> String {
        "civic.toml".to_string()
    }

    fn default_locked() -> bool {
        true
    }
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            default_lexicon: Self::default_lexicon(),
            locked: Self::default_locked(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogbookConfig {
    #[serde(default = "LogbookConfig::default_path")]
    pub path: PathBuf,
    #[serde(default = "LogbookConfig::default_aggregate")]
    pub aggregate: PathBuf,
    #[serde(default = "LogbookConfig::default_decisions")]
    pub decisions: PathBuf,
    #[serde(default = "LogbookConfig::default_fallbacks")]
    pub fallbacks: PathBuf,
}

impl LogbookConfig {
    fn default_path() -> PathBuf {
        PathBuf::from("logbook")
    }

    fn default_aggregate() -> PathBuf {
        PathBuf::from("logbook.jsonl")
    }

    fn default_decisions() -> PathBuf {
        PathBuf::from("logbook/decisions.jsonl")
    }

    fn default_fallbacks() -> PathBuf {
        PathBuf::from("logbook/fallbacks.jsonl")
    }
}

impl Default for LogbookConfig {
    fn default() -> Self {
        Self {
            path: Self::default_path(),
            aggregate: Self::default_aggregate(),
            decisions: Self::default_decisions(),
            fallbacks: Self::default_fallbacks(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServicesConfig {
    #[serde(default = "ServicesConfig::default_true")]
    pub audit_enabled: bool,
}

impl ServicesConfig {
    fn default_true() -> bool {
        true
    }
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            audit_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoliciesConfig {
    /// How many matched keywords callers surface in their response envelope.
    #[serde(default = "PoliciesConfig::default_top_keywords")]
    pub top_keywords: usize,
    #[serde(default = "PoliciesConfig::default_log_preview_len")]
    pub log_preview_len: usize,
}

impl PoliciesConfig {
    fn default_top_keywords() -> usize {
        5
    }

    fn default_log_preview_len() -> usize {
        160
    }
}

impl Default for PoliciesConfig {
    fn default() -> Self {
        Self {
            top_keywords: Self::default_top_keywords(),
            log_preview_len: Self::default_log_preview_len(),
        }
    }
}

fn absolutize(root: &Path, value: &Path) -> PathBuf {
    if value.is_absolute() {
        value.to_path_buf()
    } else {
        root.join(value)
    }
}
