//! Release-to-install pipeline
//!
//! This module provides functionality for:
//! - Looking up the latest GitHub release and selecting an RPM asset
//! - Caching the downloaded artifact
//! - Deciding whether the artifact should be installed
//! - Running the package manager

pub mod decision;
pub mod github;

pub use decision::{decide, InstallDecision, SkipReason};
pub use github::{build_client, get_latest_release, select_asset};

use crate::download::acquire_artifact;
use crate::error::UpdateError;
use crate::repo_id::RepoSlug;
use crate::rpm::Rpm;
use crate::types::Settings;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Everything one run needs to know about what the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    pub repo: RepoSlug,
    pub file_selector: String,
    pub redownload: bool,
    pub reinstall: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    Installed {
        package: String,
        version: String,
    },
    Skipped(SkipReason),
    WouldInstall {
        package: String,
        version: String,
    },
}

pub async fn update_package(
    request: &UpdateRequest,
    settings: &Settings,
) -> Result<UpdateOutcome, UpdateError> {
    let client = build_client()?;

    let release = get_latest_release(&client, settings, &request.repo).await?;
    tracing::info!(
        "Latest release of {} is {}",
        request.repo,
        release.version()
    );

    let asset = select_asset(&release.assets, &request.file_selector)?;
    tracing::info!("Selected asset {}", asset.name);

    let artifact =
        acquire_artifact(&client, &asset, &settings.cache_dir(), request.redownload).await?;

    let rpm = Rpm::new(&settings.rpm_command);
    let package = rpm.artifact_name(&artifact)?;
    let installed_versions = rpm.installed_versions(&package)?;
    let artifact_version = rpm.artifact_version(&artifact)?;
    tracing::debug!(
        "Package {}: installed {:?}, downloaded {}",
        package,
        installed_versions,
        artifact_version
    );

    let reason = match decide(&installed_versions, &artifact_version, request.reinstall)? {
        InstallDecision::Skip(reason) => {
            println!("{}", reason);
            return Ok(UpdateOutcome::Skipped(reason));
        }
        InstallDecision::Install(reason) => reason,
    };
    tracing::info!("{}", reason);

    let command = installer_command(settings, &artifact);
    if request.dry_run {
        println!("Would run: {}", format_command(&command));
        return Ok(UpdateOutcome::WouldInstall {
            package,
            version: artifact_version,
        });
    }

    run_installer(&command)?;
    Ok(UpdateOutcome::Installed {
        package,
        version: artifact_version,
    })
}

/// Argument vector for installing `artifact`, elevated when configured.
pub fn installer_command(settings: &Settings, artifact: &Path) -> Vec<OsString> {
    settings
        .elevate_command
        .iter()
        .map(OsString::from)
        .chain([
            OsString::from(&settings.package_manager),
            OsString::from("install"),
            OsString::from("--assumeyes"),
            artifact.as_os_str().to_os_string(),
        ])
        .collect()
}

pub fn run_installer(command: &[OsString]) -> Result<(), UpdateError> {
    let (program, args) = command.split_first().ok_or_else(|| UpdateError::Spawn {
        program: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty installer command"),
    })?;

    println!("Installing ...");
    println!("{}", format_command(command));

    let status = Command::new(program)
        .args(args)
        .status()
        .map_err(|source| UpdateError::Spawn {
            program: program.to_string_lossy().to_string(),
            source,
        })?;

    if !status.success() {
        return Err(UpdateError::InstallFailed {
            code: status.code(),
        });
    }
    Ok(())
}

/// Render an argument vector for display, quoting arguments that need it.
pub fn format_command(command: &[OsString]) -> String {
    command
        .iter()
        .map(|arg| {
            let arg = arg.to_string_lossy();
            let plain = !arg.is_empty()
                && arg
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || "-_./=:+@%,".contains(c));
            if plain {
                arg.to_string()
            } else {
                format!("'{}'", arg.replace('\'', r"'\''"))
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
