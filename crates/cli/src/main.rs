use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tramita_core::{normalize, CaseRecord, ChainStatus, Confidence, Engine, ResolvedOutcome};
use tramita_interchange::from_datajud;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Output format for the report subcommand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

/// Case-chain reconciliation for labor-court records.
#[derive(Parser)]
#[command(
    name = "tramita",
    version,
    about = "Case-chain reconciliation for labor-court records"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a registry JSON export into case chains
    Reconcile {
        /// Path to the registry JSON file (array of case records)
        file: PathBuf,
    },

    /// Reconcile and render the analysis report
    Report {
        /// Path to the registry JSON file (array of case records)
        file: PathBuf,
        /// Report format (markdown or json)
        #[arg(long, default_value = "markdown", value_enum)]
        format: ReportFormat,
    },

    /// Show the linking keys derived from one case number
    Keys {
        /// Case number, punctuation allowed
        number: String,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconcile { file } => {
            cmd_reconcile(&file, cli.output, cli.quiet);
        }
        Commands::Report { file, format } => {
            cmd_report(&file, format, cli.output, cli.quiet);
        }
        Commands::Keys { number } => {
            cmd_keys(&number, cli.output, cli.quiet);
        }
    }
}

/// Read, parse, and ingest a registry JSON file, exiting on anything
/// structurally unusable. Entry-level skips are warned, not fatal.
fn load_records(path: &Path, output: OutputFormat, quiet: bool) -> Vec<CaseRecord> {
    let raw = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let data: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let ingest = match from_datajud(&data) {
        Ok(i) => i,
        Err(e) => {
            let msg = format!("error ingesting '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if !quiet {
        for entry in &ingest.skipped {
            eprintln!("warning: entry {} skipped: {}", entry.index, entry.reason);
        }
    }
    ingest.records
}

fn cmd_reconcile(file: &Path, output: OutputFormat, quiet: bool) {
    let records = load_records(file, output, quiet);
    let reconciliation = Engine::with_defaults().reconcile(&records);

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&reconciliation)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => {
            println!(
                "{} record(s): {} chain(s), {} residual, {} skipped",
                reconciliation.total_records,
                reconciliation.chains.len(),
                reconciliation.residual.len(),
                reconciliation.skipped.len()
            );
            for (i, resolved) in reconciliation.chains.iter().enumerate() {
                let numbers: Vec<&str> = resolved
                    .chain
                    .members
                    .iter()
                    .map(|m| records[m.record].raw_number.as_str())
                    .collect();
                println!(
                    "chain {}: {} [{}]",
                    i + 1,
                    describe_outcome(&resolved.outcome),
                    numbers.join(", ")
                );
            }
        }
    }
}

fn cmd_report(file: &Path, format: ReportFormat, output: OutputFormat, quiet: bool) {
    let records = load_records(file, output, quiet);
    let reconciliation = Engine::with_defaults().reconcile(&records);
    let report = tramita_analyze::analyze(&reconciliation, &records);

    if quiet {
        return;
    }
    match format {
        ReportFormat::Markdown => {
            print!("{}", report.to_markdown());
        }
        ReportFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&report)
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
    }
}

fn cmd_keys(number: &str, output: OutputFormat, quiet: bool) {
    let keys = normalize(number);
    if keys.primary.is_empty() {
        report_error("case number has no digits", output, quiet);
        process::exit(1);
    }

    if quiet {
        return;
    }
    match output {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "input": number,
                "primary": keys.primary,
                "alternates": keys.alternates,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            println!("primary: {}", keys.primary);
            for (i, alternate) in keys.alternates.iter().enumerate() {
                println!("alternate {}: {}", i + 1, alternate);
            }
        }
    }
}

/// One-line human description of a resolved outcome.
fn describe_outcome(outcome: &ResolvedOutcome) -> String {
    let status = match outcome.status {
        ChainStatus::Decided => "decided",
        ChainStatus::ReformedUnconfirmed => "reformed, result unknown",
        ChainStatus::Settled => "settled",
        ChainStatus::Dismissed => "dismissed",
        ChainStatus::Unknown => "unknown",
    };
    let direction = match outcome.final_favorable_to_employee {
        Some(true) => ", favorable to employee",
        Some(false) => ", favorable to employer",
        None => "",
    };
    let confidence = match outcome.confidence {
        Confidence::High => "high",
        Confidence::Medium => "medium",
        Confidence::Low => "low",
    };
    format!("{}{} (confidence {})", status, direction, confidence)
}

fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{{\"error\": \"{}\"}}", msg.replace('"', "\\\""));
        }
    }
}
