pub mod commands;
pub mod config;
pub mod services;

pub use commands::{ensure_initialized_once, Commands, InitReport};
pub use config::CoreConfig;
pub use services::classifier::{category_only, classify, summarize, TriageSummary};
