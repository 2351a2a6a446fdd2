//! CLI entrypoint for review-council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;
mod output;
mod simulate;

use anyhow::{Result, anyhow, bail};
use clap::Parser;
use commands::{Cli, Command};
use council_application::{CouncilConfig, ReviewCoordinator};
use council_domain::config::Severity;
use council_domain::{ArbitrationHistory, assign_roles, classify_task};
use council_infrastructure::{ConfigLoader, FileConfig, InMemoryProposalStore, JsonlAuditLogger};
use output::ConsoleFormatter;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so the file writer flushes on exit
    let _log_guard = init_logging(cli.verbose, cli.log_dir.as_deref());

    info!("Starting review-council");

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };
    apply_role_overrides(&mut file_config, &cli);

    match &cli.command {
        Command::Classify(args) => {
            // Classification needs no roles, so it works before any are configured
            let profiles = council_infrastructure::merge_profiles(&file_config.expertise);
            let matches = classify_task(&args.task, &args.files, &profiles);
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&matches));
            } else {
                println!("{}", ConsoleFormatter::format_matches(&args.task, &matches));
            }
        }

        Command::Assign(args) => {
            let config = council_config(&file_config)?;
            let matches = classify_task(&args.task, &args.files, config.profiles());
            let assignment = assign_roles(&matches, config.roles(), &ArbitrationHistory::new());
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&assignment));
            } else {
                println!(
                    "{}",
                    ConsoleFormatter::format_assignment(&args.task, &assignment)
                );
            }
        }

        Command::Simulate(args) => {
            let config = council_config(&file_config)?;

            // === Dependency Injection ===
            // One store backs both the proposal repository and the arbitration ledger
            let store = Arc::new(InMemoryProposalStore::new());
            let mut coordinator = ReviewCoordinator::new(Arc::clone(&store), store, config);

            if let Some(path) = &cli.audit_log {
                let Some(logger) = JsonlAuditLogger::new(path) else {
                    bail!("Could not open audit log {}", path.display());
                };
                info!("Writing audit events to {}", logger.path().display());
                coordinator = coordinator.with_audit_logger(Arc::new(logger));
            }

            let report = simulate::run(&coordinator, args).await?;
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&report));
            } else {
                println!("{}", ConsoleFormatter::format_simulation(&report));
            }
        }

        Command::ShowConfig => {
            if cli.json {
                println!("{}", ConsoleFormatter::format_json(&file_config));
                return Ok(());
            }

            let sources = if cli.no_config {
                vec!["Configuration files disabled (--no-config)".to_string()]
            } else {
                ConfigLoader::config_sources(cli.config.as_ref())
            };

            let (config, issues) = file_config.to_council_config();
            if !issues.is_empty() {
                eprintln!("{}", ConsoleFormatter::format_issues(&issues));
            }
            match config {
                Some(config) => println!("{}", ConsoleFormatter::format_config(&sources, &config)),
                None => {
                    println!("{}", sources.join("\n"));
                    bail!("Configuration is invalid");
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging based on verbosity level.
///
/// Console logs go to stderr so stdout stays clean for `--json`. With
/// `--log-dir` a second, uncolored layer writes to a daily-rolling file.
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let console = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let (file_layer, guard) = match log_dir.map(open_log_file) {
        Some(Ok(appender)) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Warning: could not open log directory: {}", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(console)
        .with(file_layer)
        .init();

    guard
}

fn open_log_file(
    dir: &Path,
) -> Result<RollingFileAppender, tracing_appender::rolling::InitError> {
    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("review-council")
        .filename_suffix("log")
        .build(dir)
}

/// Command-line role flags replace the configured lists.
fn apply_role_overrides(file_config: &mut FileConfig, cli: &Cli) {
    if let Some(planner) = &cli.planner {
        file_config.roles.planner = Some(planner.clone());
    }
    if !cli.reviewers.is_empty() {
        file_config.roles.reviewers = cli.reviewers.clone();
    }
    if !cli.arbiters.is_empty() {
        file_config.roles.arbiters = cli.arbiters.clone();
    }
}

/// Build the validated config, logging warnings and failing on errors.
fn council_config(file_config: &FileConfig) -> Result<CouncilConfig> {
    let (config, issues) = file_config.to_council_config();

    for issue in issues.iter().filter(|i| i.severity == Severity::Warning) {
        warn!("{}", issue.message);
    }

    match config {
        Some(config) => Ok(config),
        None => bail!(
            "Invalid configuration:\n{}\nSet roles in council.toml or pass --planner and --reviewer",
            ConsoleFormatter::format_issues(&issues)
        ),
    }
}
