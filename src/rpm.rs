//! Read-only queries against the local RPM database and RPM files.

use crate::error::UpdateError;
use std::borrow::Cow;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

pub struct Rpm {
    program: String,
}

impl Rpm {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Package name embedded in the RPM file at `path`.
    pub fn artifact_name(&self, path: &Path) -> Result<String, UpdateError> {
        self.query_artifact(path, "%{NAME}")
    }

    /// Version embedded in the RPM file at `path`.
    pub fn artifact_version(&self, path: &Path) -> Result<String, UpdateError> {
        self.query_artifact(path, "%{VERSION}")
    }

    /// Versions of `package` currently installed. Empty when it is not installed.
    pub fn installed_versions(&self, package: &str) -> Result<Vec<String>, UpdateError> {
        let args = [
            OsStr::new("-q"),
            OsStr::new("--queryformat"),
            OsStr::new("%{VERSION}\n"),
            OsStr::new(package),
        ];
        let output = self.run(&args)?;
        parse_installed_versions(&self.describe(&args), &output)
    }

    fn query_artifact(&self, path: &Path, format: &str) -> Result<String, UpdateError> {
        let args = [
            OsStr::new("-qp"),
            OsStr::new("--queryformat"),
            OsStr::new(format),
            path.as_os_str(),
        ];
        let output = self.run(&args)?;
        let command = self.describe(&args);
        if !output.status.success() {
            return Err(query_error(command, &output));
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if value.is_empty() {
            return Err(UpdateError::Query {
                command,
                status: output.status.to_string(),
                stderr: "empty output".to_string(),
            });
        }
        Ok(value)
    }

    fn run(&self, args: &[&OsStr]) -> Result<Output, UpdateError> {
        tracing::debug!("Running: {}", self.describe(args));
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| UpdateError::Spawn {
                program: self.program.clone(),
                source,
            })
    }

    fn describe(&self, args: &[&OsStr]) -> String {
        std::iter::once(Cow::Borrowed(self.program.as_str()))
            .chain(args.iter().map(|a| a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn query_error(command: String, output: &Output) -> UpdateError {
    UpdateError::Query {
        command,
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    }
}

/// Interpret the output of `rpm -q`.
///
/// rpm exits non-zero both when the package is absent and when the query
/// itself fails; only the former is reported as "is not installed" on every
/// line of stdout.
pub(crate) fn parse_installed_versions(
    command: &str,
    output: &Output,
) -> Result<Vec<String>, UpdateError> {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if output.status.success() {
        return Ok(lines.into_iter().map(str::to_string).collect());
    }

    if !lines.is_empty() && lines.iter().all(|l| l.ends_with("is not installed")) {
        return Ok(Vec::new());
    }

    Err(query_error(command.to_string(), output))
}
