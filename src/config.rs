use crate::types::*;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_NAME: &str = "update-rpm-github";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "UPDATE_RPM_GITHUB_CONFIG";

pub fn get_config_file_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        return Ok(PathBuf::from(path));
    }
    let path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join(APP_NAME)
        .join(CONFIG_FILE_NAME);
    tracing::debug!("Config file path: {}", path.display());
    Ok(path)
}

pub fn load_settings() -> Result<Settings> {
    let config_path = get_config_file_path()?;
    let mut settings = load_settings_from(&config_path)?;
    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

/// Read settings from `config_path`, falling back to defaults when the file is absent.
pub fn load_settings_from(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        return Ok(Settings::default());
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Could not read config file at {}", config_path.display()))?;

    serde_json::from_str(&content).with_context(|| {
        format!(
            "Could not parse config file {} as JSON",
            config_path.display()
        )
    })
}

pub fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(dir) = lookup("UPDATE_RPM_GITHUB_CACHE_DIR") {
        settings.cache_dir = Some(dir);
    }

    if let Some(api_base) = lookup("UPDATE_RPM_GITHUB_API_URL") {
        settings.api_base = api_base.trim_end_matches('/').to_string();
    }

    if let Some(package_manager) = lookup("UPDATE_RPM_GITHUB_PACKAGE_MANAGER") {
        settings.package_manager = package_manager;
    }

    if let Some(rpm_command) = lookup("UPDATE_RPM_GITHUB_RPM_COMMAND") {
        settings.rpm_command = rpm_command;
    }

    // Whitespace separated; an empty value disables elevation
    if let Some(elevate) = lookup("UPDATE_RPM_GITHUB_ELEVATE_COMMAND") {
        settings.elevate_command = elevate.split_whitespace().map(str::to_string).collect();
    }

    settings.github_token = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty());
}
