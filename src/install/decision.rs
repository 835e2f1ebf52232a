//! Decide whether a downloaded package should be installed.

use crate::error::UpdateError;
use crate::version::compare_versions;
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallDecision {
    Install(InstallReason),
    Skip(SkipReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallReason {
    NotInstalled,
    Upgrade { installed: String, artifact: String },
    Reinstall { version: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyInstalled { version: String },
    NewerInstalled { installed: String, artifact: String },
}

impl fmt::Display for InstallReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallReason::NotInstalled => write!(f, "Package not installed; installing."),
            InstallReason::Upgrade {
                installed,
                artifact,
            } => write!(f, "Updating from version {} to {}.", installed, artifact),
            InstallReason::Reinstall { version } => {
                write!(f, "Version {} already installed; reinstalling.", version)
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyInstalled { version } => {
                write!(f, "Version {} already installed; not installing.", version)
            }
            SkipReason::NewerInstalled {
                installed,
                artifact,
            } => write!(
                f,
                "Installed version {} newer than downloaded version {}; not installing.",
                installed, artifact
            ),
        }
    }
}

/// Compare what is installed against the downloaded artifact.
///
/// When several versions of the package are installed side by side the
/// highest one is used. A downgrade is never chosen.
pub fn decide(
    installed_versions: &[String],
    artifact_version: &str,
    reinstall: bool,
) -> Result<InstallDecision, UpdateError> {
    if installed_versions.len() > 1 {
        tracing::warn!(
            "Multiple installed versions found ({}); comparing against the highest",
            installed_versions.join(", ")
        );
    }

    let Some(installed) = highest_version(installed_versions)? else {
        return Ok(InstallDecision::Install(InstallReason::NotInstalled));
    };

    let decision = match compare_versions(installed, artifact_version)? {
        Ordering::Less => InstallDecision::Install(InstallReason::Upgrade {
            installed: installed.to_string(),
            artifact: artifact_version.to_string(),
        }),
        Ordering::Equal if reinstall => InstallDecision::Install(InstallReason::Reinstall {
            version: installed.to_string(),
        }),
        Ordering::Equal => InstallDecision::Skip(SkipReason::AlreadyInstalled {
            version: installed.to_string(),
        }),
        Ordering::Greater => InstallDecision::Skip(SkipReason::NewerInstalled {
            installed: installed.to_string(),
            artifact: artifact_version.to_string(),
        }),
    };
    Ok(decision)
}

fn highest_version(versions: &[String]) -> Result<Option<&str>, UpdateError> {
    let mut highest: Option<&str> = None;
    for version in versions {
        highest = match highest {
            Some(current) if compare_versions(current, version)? != Ordering::Less => {
                Some(current)
            }
            _ => Some(version.as_str()),
        };
    }
    Ok(highest)
}
