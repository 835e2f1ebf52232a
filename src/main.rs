mod cli;
mod config;
mod download;
mod error;
mod install;
mod repo_id;
mod rpm;
mod types;
mod version;


use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use config::load_settings;
use error::UpdateError;
use install::{update_package, UpdateOutcome, UpdateRequest};
use repo_id::RepoSlug;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    setup_logging(&cli)?;

    let request = build_request(&cli)?;
    let settings = load_settings().context("Failed to load settings")?;
    tracing::debug!(
        "Cache directory: {}, API: {}",
        settings.cache_dir().display(),
        settings.api_base
    );

    match update_package(&request, &settings).await {
        Ok(UpdateOutcome::Installed { package, version }) => {
            tracing::info!("{} {} installed", package, version);
        }
        Ok(UpdateOutcome::WouldInstall { package, version }) => {
            tracing::info!("Dry run: {} {} not installed", package, version);
        }
        Ok(UpdateOutcome::Skipped(reason)) => {
            tracing::debug!("Nothing to do: {:?}", reason);
        }
        Err(UpdateError::AssetNotFound {
            selector,
            available,
        }) => {
            println!(
                "file_selector='{}' not found. Available options:\n{}",
                selector,
                available.join("\n")
            );
            std::process::exit(1);
        }
        Err(e @ UpdateError::InstallFailed { .. }) => {
            tracing::error!("{}", e);
            std::process::exit(e.exit_code());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to update {}", request.repo));
        }
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if cli.quiet {
        "error"
    } else if cli.verbose == 0 {
        "warn"
    } else if cli.verbose == 1 {
        "info"
    } else {
        "debug"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    Ok(())
}

fn build_request(cli: &Cli) -> Result<UpdateRequest, UpdateError> {
    let repo = RepoSlug::parse(&cli.repo)?;
    Ok(UpdateRequest {
        repo,
        file_selector: cli.file_selector.clone(),
        redownload: cli.redownload,
        reinstall: cli.reinstall,
        dry_run: cli.dry_run,
    })
}
