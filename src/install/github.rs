//! GitHub API interaction module
//!
//! Provides functions for querying the latest release of a repository and
//! picking one of its assets.

use crate::error::UpdateError;
use crate::repo_id::RepoSlug;
use crate::types::{AssetInfo, GitHubAsset, GitHubRelease, Settings};
use reqwest::StatusCode;

pub const USER_AGENT: &str = concat!("update-rpm-github/", env!("CARGO_PKG_VERSION"));

/// Build GitHub API URL for fetching the latest release of `repo`
pub fn build_gh_release_url(api_base: &str, repo: &RepoSlug) -> String {
    format!(
        "{}/repos/{}/releases/latest",
        api_base.trim_end_matches('/'),
        repo.full_repo()
    )
}

pub fn build_client() -> Result<reqwest::Client, UpdateError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|source| UpdateError::Http {
            url: String::new(),
            source,
        })
}

/// Fetch the latest release metadata from the GitHub API
pub async fn get_latest_release(
    client: &reqwest::Client,
    settings: &Settings,
    repo: &RepoSlug,
) -> Result<GitHubRelease, UpdateError> {
    let url = build_gh_release_url(&settings.api_base, repo);
    tracing::debug!("Fetching GitHub release info from: {}", url);

    let mut request = client
        .get(&url)
        .header("Accept", "application/vnd.github.v3+json");

    if let Some(token) = &settings.github_token {
        request = request.header("Authorization", format!("token {}", token));
        tracing::debug!("Using GITHUB_TOKEN");
    }

    let http_err = |source| UpdateError::Http {
        url: url.clone(),
        source,
    };

    let response = request.send().await.map_err(http_err)?;
    let status = response.status();
    if !status.is_success() {
        if status == StatusCode::NOT_FOUND {
            return Err(UpdateError::LatestNotFound {
                repo: repo.full_repo(),
            });
        }
        return Err(UpdateError::RequestFailed {
            url: url.clone(),
            status,
        });
    }

    let body = response.text().await.map_err(http_err)?;
    parse_release(repo, &body)
}

pub fn parse_release(repo: &RepoSlug, body: &str) -> Result<GitHubRelease, UpdateError> {
    serde_json::from_str(body).map_err(|source| UpdateError::Parse {
        repo: repo.full_repo(),
        source,
    })
}

/// Pick the first asset whose name contains `selector`, in release order.
pub fn select_asset(assets: &[GitHubAsset], selector: &str) -> Result<AssetInfo, UpdateError> {
    assets
        .iter()
        .find(|a| a.name.contains(selector))
        .map(AssetInfo::from)
        .ok_or_else(|| UpdateError::AssetNotFound {
            selector: selector.to_string(),
            available: assets.iter().map(|a| a.name.clone()).collect(),
        })
}
