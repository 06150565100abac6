mod display;
mod input;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use leadsalvage_core::{SalvageConfig, build_report};
use tracing::Level;

/// Salvage failed-lead details from an import result and reconcile its counters.
#[derive(Debug, Parser)]
#[command(name = "leadsalvage", version, about)]
struct Cli {
    /// Result document (JSON). Reads stdin when omitted or `-`.
    file: Option<PathBuf>,

    /// TOML file overriding the user-facing texts.
    #[arg(long, env = "LEADSALVAGE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Log at DEBUG level.
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings only.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
    tracing::debug!("leadsalvage v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => SalvageConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SalvageConfig::default(),
    };

    let doc = input::read_document(cli.file.as_deref())?;
    let report = build_report(doc.failed_leads.as_slice(), &doc.displayed(), &config);
    tracing::info!(stats = %display::summary_line(&report.stats), "reconciled");

    match cli.format {
        Format::Text => display::print_report_card(&report, &config),
        Format::Json => {
            let json = serde_json::to_string_pretty(&report).context("serialising report")?;
            println!("{json}");
        }
    }

    Ok(())
}
