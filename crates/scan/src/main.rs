mod config;
mod scanner;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::{OutputMode, ScanConfig};
use scanner::{ScanSummary, Scanner};

#[derive(Parser)]
#[command(name = "netstatus-scan")]
#[command(about = "Classify net_status console output into typed lines")]
struct Args {
    #[arg(help = "Console log to read (stdin when omitted)")]
    input: Option<PathBuf>,

    #[arg(long = "only", value_name = "TYPE", help = "Only try these line types")]
    only: Vec<String>,

    #[arg(long, help = "Print the canonical text of every matched line")]
    render: bool,

    #[arg(long, conflicts_with = "render", help = "Print matched lines as JSON")]
    json: bool,

    #[arg(long, help = "Skip the per-type summary")]
    no_summary: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = ScanConfig {
        input: args.input,
        summary: !args.no_summary,
        ..Default::default()
    };
    if !args.only.is_empty() {
        config.line_types = ScanConfig::parse_line_types(&args.only)?;
    }
    config.output = if args.json {
        OutputMode::Json
    } else if args.render {
        OutputMode::Render
    } else {
        OutputMode::Quiet
    };

    let scanner = Scanner::new(&config);
    let stdout = io::stdout().lock();

    let summary = match &config.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            log::info!("Scanning {}", path.display());
            scanner.scan(BufReader::new(file), stdout)?
        }
        None => {
            log::info!("Scanning stdin");
            scanner.scan(io::stdin().lock(), stdout)?
        }
    };

    if config.summary {
        log_summary(&summary);
    }

    Ok(())
}

fn log_summary(summary: &ScanSummary) {
    log::info!(
        "{} lines read, {} matched, {} unmatched",
        summary.lines_read,
        summary.lines_matched,
        summary.lines_unmatched()
    );
    log::info!(
        "{} net channel lines, {} other",
        summary.dual_float_lines(),
        summary.lines_matched - summary.dual_float_lines()
    );
    for (line_type, count) in &summary.by_type {
        log::info!("  {:<22} {}", line_type.as_str(), count);
    }
}
