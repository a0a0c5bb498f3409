//! # logsentry - CLI Entry Point
//!
//! Command-line interface for logsentry.
//!
//! Commands:
//! - `ingest`      - Parse an auth log and append its events to the record
//! - `report`      - Print the analysis report from the accumulated record
//! - `analyze`     - Ingest a log file, then print the report
//! - `verify`      - Check archived logs against their digest sidecars
//! - `init-config` - Generate a default configuration file

use clap::{Parser, Subcommand};
use log::info;
use std::path::{Path, PathBuf};

use logsentry::{AuthEvent, SentryConfig, SentryError, SentryResult};
use logsentry::analysis;
use logsentry::integrity;
use logsentry::parser::{self, PatternSet};
use logsentry::report;
use logsentry::store::EventStore;

/// logsentry - After-the-fact auth log review and archive integrity checks.
///
/// Reads authentication logs (plain or gzip), accumulates login events in a
/// plain-file record, and reports brute-force sources, targeted accounts,
/// hourly activity, and username enumeration. Review only.
#[derive(Parser, Debug)]
#[command(name = "logsentry")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long, default_value = "logsentry.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse an auth log and append its events to the record.
    Ingest {
        /// Log file to ingest (plain text or gzip).
        logfile: PathBuf,

        /// Event record to append to (overrides the config file).
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Print the analysis report from the accumulated record.
    Report {
        /// Event record to read (overrides the config file).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Rows in the top attacker table.
        #[arg(long)]
        top: Option<usize>,

        /// Distinct-username threshold for the enumeration section.
        #[arg(long)]
        threshold: Option<usize>,
    },

    /// Ingest a log file, then print the report over the whole record.
    Analyze {
        /// Log file to ingest (plain text or gzip).
        logfile: PathBuf,

        /// Event record to use (overrides the config file).
        #[arg(long)]
        store: Option<PathBuf>,

        /// Rows in the top attacker table.
        #[arg(long)]
        top: Option<usize>,

        /// Distinct-username threshold for the enumeration section.
        #[arg(long)]
        threshold: Option<usize>,
    },

    /// Check archived log files against their recorded SHA-256 digests.
    Verify {
        /// Directory holding archives and digest sidecars (overrides the
        /// config file).
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Digest sidecar filename pattern, e.g. "*.sha256".
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Generate a default configuration file.
    InitConfig,
}

fn main() -> SentryResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { logfile, store } => cmd_ingest(&cli.config, &logfile, store),
        Commands::Report { store, top, threshold } => {
            cmd_report(&cli.config, store, top, threshold)
        }
        Commands::Analyze { logfile, store, top, threshold } => {
            cmd_analyze(&cli.config, &logfile, store, top, threshold)
        }
        Commands::Verify { dir, pattern } => cmd_verify(&cli.config, dir, pattern),
        Commands::InitConfig => cmd_init_config(&cli.config),
    }
}

/// Ingest one log file into the event record.
///
/// Appends every extracted event; rows already present from earlier runs
/// stay where they are. Ingesting the same file twice doubles its rows.
fn cmd_ingest(
    config_path: &Path,
    logfile: &Path,
    store_override: Option<PathBuf>,
) -> SentryResult<()> {
    let config = load_config(config_path)?;
    std::fs::create_dir_all(&config.general.data_dir)?;
    let store_path = store_override.unwrap_or(config.general.store_file);

    let set = PatternSet::standard();
    let (events, summary) = parser::scan_file(logfile, &set)?;

    let store = EventStore::new(store_path);
    store.append(&events)?;

    println!(
        "Ingested {}: {} lines read, {} events, {} skipped",
        logfile.display(),
        summary.lines_read,
        summary.events_parsed,
        summary.lines_skipped,
    );
    println!("Record: {}", store.path().display());

    Ok(())
}

/// Print the analysis report from the accumulated record.
fn cmd_report(
    config_path: &Path,
    store_override: Option<PathBuf>,
    top: Option<usize>,
    threshold: Option<usize>,
) -> SentryResult<()> {
    let config = load_config(config_path)?;
    let top_n = top.unwrap_or(config.analysis.top_n);
    let enum_threshold = threshold.unwrap_or(config.analysis.enumeration_threshold);
    let recent = config.analysis.recent_successes;
    let store_path = store_override.unwrap_or(config.general.store_file);

    let store = EventStore::new(store_path);
    let rows = store.load()?;
    info!("Loaded {} events from {}", rows.len(), store.path().display());

    print_report(&rows, top_n, enum_threshold, recent);

    Ok(())
}

/// Ingest a log file, then print the report over the whole record.
fn cmd_analyze(
    config_path: &Path,
    logfile: &Path,
    store_override: Option<PathBuf>,
    top: Option<usize>,
    threshold: Option<usize>,
) -> SentryResult<()> {
    let config = load_config(config_path)?;
    std::fs::create_dir_all(&config.general.data_dir)?;
    let top_n = top.unwrap_or(config.analysis.top_n);
    let enum_threshold = threshold.unwrap_or(config.analysis.enumeration_threshold);
    let recent = config.analysis.recent_successes;
    let store_path = store_override.unwrap_or(config.general.store_file);

    let set = PatternSet::standard();
    let (events, summary) = parser::scan_file(logfile, &set)?;

    let store = EventStore::new(store_path);
    store.append(&events)?;

    println!(
        "Ingested {}: {} lines read, {} events, {} skipped",
        logfile.display(),
        summary.lines_read,
        summary.events_parsed,
        summary.lines_skipped,
    );
    println!();

    // Report over everything accumulated so far, not just this file.
    let rows = store.load()?;
    print_report(&rows, top_n, enum_threshold, recent);

    Ok(())
}

/// Check archived log files against their recorded digests.
///
/// Exits non-zero when any file is modified, missing, or unreadable, so
/// cron jobs can alert on the exit code alone.
fn cmd_verify(
    config_path: &Path,
    dir_override: Option<PathBuf>,
    pattern_override: Option<String>,
) -> SentryResult<()> {
    let config = load_config(config_path)?;
    let dir = dir_override.unwrap_or(config.integrity.archive_dir);
    let pattern = pattern_override.unwrap_or(config.integrity.digest_pattern);

    println!("Checking archives under {} (sidecars: {})", dir.display(), pattern);
    println!();

    let reports = integrity::verify_directory(&dir, &pattern)?;
    for check in &reports {
        println!("{}", report::render_check_line(check));
    }
    println!();
    println!("{}", report::render_check_summary(&reports));

    if reports.iter().any(|check| !check.is_ok()) {
        std::process::exit(1);
    }

    Ok(())
}

/// Generate a default configuration file.
fn cmd_init_config(config_path: &Path) -> SentryResult<()> {
    if config_path.exists() {
        return Err(SentryError::Config(format!(
            "Configuration file already exists: {}. Remove it first or use a different path.",
            config_path.display()
        )));
    }

    SentryConfig::write_default(config_path)?;
    println!("Default configuration written to: {}", config_path.display());
    println!("Edit this file to set the record path, report knobs, and archive directory.");
    println!();
    println!("Key settings:");
    println!("  [general]   - data_dir and the event record path");
    println!("  [analysis]  - top_n and enumeration_threshold for the report");
    println!("  [integrity] - archive_dir and the digest sidecar pattern");

    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Load the configuration file if present, else fall back to defaults.
fn load_config(path: &Path) -> SentryResult<SentryConfig> {
    if path.exists() {
        info!("Loading configuration from: {}", path.display());
        SentryConfig::from_file(path)
    } else {
        info!("No config file found, using defaults. Run 'init-config' to generate one.");
        Ok(SentryConfig::default())
    }
}

/// Compute and print every report section from the full event record.
fn print_report(rows: &[AuthEvent], top_n: usize, enum_threshold: usize, recent: usize) {
    let top = analysis::brute_force_top(rows, top_n);
    let targeted = analysis::targeted_usernames(rows);
    let hourly = analysis::hourly_distribution(rows);
    let hits = analysis::username_enumeration(rows, enum_threshold);
    let successes = analysis::recent_successes(rows, recent);

    print!("{}", report::render_brute_force(&top));
    println!();
    print!("{}", report::render_targeted_usernames(&targeted));
    println!();
    print!("{}", report::render_hourly(&hourly));
    println!();
    print!("{}", report::render_enumeration(&hits, enum_threshold));
    println!();
    print!("{}", report::render_recent_successes(&successes));
}
