use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    #[serde(default)]
    pub cache_dir: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_rpm_command")]
    pub rpm_command: String,
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    #[serde(default = "default_elevate_command")]
    pub elevate_command: Vec<String>,
    #[serde(skip)]
    pub github_token: Option<String>,
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}
fn default_rpm_command() -> String {
    "rpm".to_string()
}
fn default_package_manager() -> String {
    "dnf".to_string()
}
fn default_elevate_command() -> Vec<String> {
    vec!["sudo".to_string(), "-S".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_dir: None,
            api_base: default_api_base(),
            rpm_command: default_rpm_command(),
            package_manager: default_package_manager(),
            elevate_command: default_elevate_command(),
            github_token: None,
        }
    }
}

impl Settings {
    /// Directory downloaded artifacts are cached in.
    pub fn cache_dir(&self) -> PathBuf {
        match &self.cache_dir {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => std::env::temp_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssetInfo {
    pub name: String,
    pub download_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub assets: Vec<GitHubAsset>,
}

impl GitHubRelease {
    /// Tag name without the conventional leading `v`.
    pub fn version(&self) -> &str {
        self.tag_name.strip_prefix('v').unwrap_or(&self.tag_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubAsset {
    pub name: String,
    pub browser_download_url: String,
}

impl From<&GitHubAsset> for AssetInfo {
    fn from(asset: &GitHubAsset) -> Self {
        AssetInfo {
            name: asset.name.clone(),
            download_url: asset.browser_download_url.clone(),
        }
    }
}
