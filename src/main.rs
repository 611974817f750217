// file: src/main.rs
// description: daemon entry point: load configuration and run sync cycles forever
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use repo_knowledge_sync::utils::logging::{format_error, format_success, format_warning};
use repo_knowledge_sync::{Config, CycleResult, Daemon, SyncCycle};
use repo_knowledge_sync::repository::credentials::redact_url;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "repo-knowledge-sync")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Mirror a git repository into a knowledge service collection", long_about = None)]
struct Cli {
    /// Optional toml file; `config/default.toml` is used when present
    #[arg(short, long, value_name = "FILE", env = "REPO_SYNC_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Run a single cycle and exit instead of looping forever
    #[arg(long, action = ArgAction::SetTrue)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    repo_knowledge_sync::utils::logging::init_logger(cli.color, cli.verbose);

    if let Some(path) = &cli.config {
        info!("Loading configuration from: {}", path.display());
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    log_config(&config);

    let cycle = SyncCycle::new(&config).context("Failed to initialise sync cycle")?;
    let daemon = Daemon::new(cycle, config.sync.interval());

    if cli.once {
        return run_once(&daemon, cli.color).await;
    }

    daemon.run_forever().await;
    Ok(())
}

async fn run_once(daemon: &Daemon<SyncCycle>, color: bool) -> Result<()> {
    colored::control::set_override(color);

    let result = daemon.run_guarded(1).await;
    match result {
        CycleResult::Completed(report) if report.files_failed() == 0 => {
            println!("{}", format_success(&report.summary()));
            Ok(())
        }
        CycleResult::Completed(report) => {
            println!("{}", format_warning(&report.summary()));
            Ok(())
        }
        CycleResult::Failed(message) | CycleResult::Panicked(message) => {
            eprintln!("{}", format_error(&message));
            Err(anyhow::anyhow!("Sync cycle failed: {}", message))
        }
    }
}

fn log_config(config: &Config) {
    match &config.repository.url {
        Some(url) => info!("Repository: {}", redact_url(url)),
        None => warn!("No repository URL configured; only existing files will be uploaded"),
    }
    info!("Mirror directory: {}", config.repository.local_path.display());
    info!("Knowledge service: {}", config.knowledge.base_url);
    info!("Knowledge collection: {}", config.knowledge.collection_id);
    info!(
        "Allowed extensions: {}",
        config.sync.allowed_extensions.join(",")
    );
    info!("Sync interval: {} seconds", config.sync.interval_secs);
}
