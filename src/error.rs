use reqwest::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("Invalid owner + repo '{input}': {reason}")]
    InvalidRepo { input: String, reason: String },

    #[error("No releases found for {repo}")]
    LatestNotFound { repo: String },

    #[error("Request to {url} failed: {status}")]
    RequestFailed { url: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not parse release metadata for {repo}: {source}")]
    Parse {
        repo: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("file_selector='{selector}' not found")]
    AssetNotFound {
        selector: String,
        available: Vec<String>,
    },

    #[error("Refusing to cache asset with unsafe file name '{name}'")]
    UnsafeAssetName { name: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Could not run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` failed ({status}): {stderr}")]
    Query {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("Cannot order versions '{left}' and '{right}'")]
    UnparsableVersion { left: String, right: String },

    #[error("Installer exited with {}", code.map_or_else(|| "a signal".to_string(), |c| format!("code {}", c)))]
    InstallFailed { code: Option<i32> },
}

impl UpdateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        UpdateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code the binary should use for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            UpdateError::InstallFailed { code } => code.unwrap_or(1),
            _ => 1,
        }
    }
}
