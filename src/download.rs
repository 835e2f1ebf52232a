use crate::error::UpdateError;
use crate::types::AssetInfo;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use tempfile::NamedTempFile;

/// Location of the cached artifact for `asset_name` inside `cache_dir`.
///
/// The path depends only on the file name, so repeated runs that select the
/// same asset share one cache entry.
pub fn cache_path(cache_dir: &Path, asset_name: &str) -> Result<PathBuf, UpdateError> {
    let mut components = Path::new(asset_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(cache_dir.join(asset_name)),
        _ => Err(UpdateError::UnsafeAssetName {
            name: asset_name.to_string(),
        }),
    }
}

pub fn needs_download(path: &Path, redownload: bool) -> bool {
    redownload || !path.exists()
}

/// Make the selected asset available locally, downloading it only when the
/// cache entry is missing or `redownload` is set.
pub async fn acquire_artifact(
    client: &reqwest::Client,
    asset: &AssetInfo,
    cache_dir: &Path,
    redownload: bool,
) -> Result<PathBuf, UpdateError> {
    let path = cache_path(cache_dir, &asset.name)?;

    if !needs_download(&path, redownload) {
        tracing::info!("Using cached {}", path.display());
        return Ok(path);
    }

    fs::create_dir_all(cache_dir).map_err(|e| UpdateError::io(cache_dir, e))?;
    println!("Downloading {} to {}", asset.download_url, path.display());
    download_file(client, &asset.download_url, &path).await?;
    Ok(path)
}

pub async fn download_file(
    client: &reqwest::Client,
    url: &str,
    local_path: &Path,
) -> Result<(), UpdateError> {
    let http_err = |source| UpdateError::Http {
        url: url.to_string(),
        source,
    };

    let response = client.get(url).send().await.map_err(http_err)?;
    let status = response.status();
    if !status.is_success() {
        return Err(UpdateError::RequestFailed {
            url: url.to_string(),
            status,
        });
    }
    let total_size = response.content_length().unwrap_or(0);

    let filename = local_path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let pb = ProgressBar::new(total_size);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{msg} {spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb.set_message(format!("Downloading {}", filename));

    // Stage next to the target so the final rename never crosses filesystems
    let staging_dir = local_path.parent().unwrap_or_else(|| Path::new("."));
    let mut staged =
        NamedTempFile::new_in(staging_dir).map_err(|e| UpdateError::io(staging_dir, e))?;

    let mut downloaded = 0u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(http_err)?;
        staged
            .write_all(&chunk)
            .map_err(|e| UpdateError::io(staged.path(), e))?;
        downloaded += chunk.len() as u64;
        pb.set_position(downloaded);
    }
    staged
        .flush()
        .map_err(|e| UpdateError::io(staged.path(), e))?;

    staged
        .persist(local_path)
        .map_err(|e| UpdateError::io(local_path, e.error))?;

    pb.finish_with_message("Download complete");
    tracing::debug!("Wrote {} bytes to {}", downloaded, local_path.display());
    Ok(())
}
