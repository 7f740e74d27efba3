use anyhow::{Context, Result};
use clap::Parser;

use pulse_core::commands::Commands;

#[derive(Parser, Debug)]
#[command(
    name = "pulse-agent",
    about = "Classify citizen feedback messages from the command line"
)]
struct Cli {
    /// Messages to classify. With no input, runs the built-in demo battery.
    messages: Vec<String>,
    /// Read additional messages from a file, one per line.
    #[arg(long)]
    file: Option<String>,
    /// Print confidence, matched keywords and the per-category scores.
    #[arg(long)]
    detailed: bool,
}

const DEMO_MESSAGES: &[&str] = &[
    "Gazi Mahallesi girişinde sinyalizasyon aksaklığı var.",
    "İnternet çok yavaş, wifi bağlantısı sürekli kopuyor.",
    "Parkta çöpler toplanmıyor, çok kirli.",
    "Cadde üzerinde derin çukurlar var, yol bozuk.",
    "Hava çok kirli, egzoz dumanı çok fazla.",
    "Mobil veri çekmiyor, 4G sinyali yok.",
    "Yeni bir bisiklet yolu yapılabilir mi?",
    "Yeşil alan çok az, ağaç dikilmeli.",
    "Trafik çok yoğun, kavşakta ışıklar çalışmıyor.",
    "Bu bölgede daha fazla çöp kutusu olmalı.",
];

fn main() -> Result<()> {
    let cli = Cli::parse();
    let commands = Commands::new()?;

    let mut messages = cli.messages.clone();
    if let Some(path) = &cli.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading message file {path}"))?;
        messages.extend(
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
    }
    if messages.is_empty() {
        messages = DEMO_MESSAGES.iter().map(|s| s.to_string()).collect();
    }

    for message in &messages {
        if cli.detailed {
            let result = commands.classify(message)?;
            let summary = commands.summarize(&result);
            println!("{message}");
            println!("  category:   {}", result.category);
            println!("  confidence: {:.2}%", result.confidence);
            if !summary.top_keywords.is_empty() {
                println!("  keywords:   {}", summary.top_keywords.join(", "));
            }
            for (category, score) in &result.detail.scores {
                println!("  score[{category}]: {score:.2}");
            }
        } else {
            let category = commands.category_only(message)?;
            println!("{category}\t{message}");
        }
    }

    Ok(())
}
