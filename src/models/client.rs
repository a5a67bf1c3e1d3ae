//! Managed model client backed by hf-hub
//!
//! Downloads through the native Rust hf-hub crate instead of shelling out to
//! huggingface-cli. Files land in the HuggingFace cache first and are then
//! linked into the local model directory so both download paths produce the
//! same layout without storing the weights twice.

use crate::error::{ModelError, ModelResult};
use async_trait::async_trait;
use hf_hub::api::tokio::{Api, ApiBuilder};
use std::path::{Path, PathBuf};

/// In-process handle able to download models on behalf of the caller
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Download every file of `model_id` into `target_dir`
    async fn download(&self, model_id: &str, target_dir: &Path) -> ModelResult<()>;
}

/// Managed client for the HuggingFace Hub
pub struct HubClient {
    api: Api,
}

impl HubClient {
    /// Build a hub client, optionally authenticated
    pub fn connect(token: Option<String>) -> ModelResult<Self> {
        let api = ApiBuilder::new()
            .with_token(token)
            .with_progress(true)
            .build()
            .map_err(|e| ModelError::ClientUnavailable(e.to_string()))?;
        Ok(Self { api })
    }

    /// Build a hub client using a specific cache directory
    pub fn connect_with_cache(cache_dir: PathBuf, token: Option<String>) -> ModelResult<Self> {
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir)
            .with_token(token)
            .with_progress(true)
            .build()
            .map_err(|e| ModelError::ClientUnavailable(e.to_string()))?;
        Ok(Self { api })
    }
}

#[async_trait]
impl ModelClient for HubClient {
    fn name(&self) -> &str {
        "hf-hub"
    }

    async fn download(&self, model_id: &str, target_dir: &Path) -> ModelResult<()> {
        let hub_err = |message: String| ModelError::Hub {
            model_id: model_id.to_string(),
            message,
        };

        tracing::info!(model_id = %model_id, target_dir = ?target_dir, "Starting model download via hf-hub");

        let repo = self.api.model(model_id.to_string());
        let info = repo
            .info()
            .await
            .map_err(|e| hub_err(format!("Failed to fetch repository info: {}", e)))?;

        tracing::debug!(
            model_id = %model_id,
            revision = %info.sha,
            files = info.siblings.len(),
            "Fetched repository listing"
        );

        for sibling in &info.siblings {
            let file = sibling.rfilename.as_str();
            tracing::debug!(model_id = %model_id, file = %file, "Downloading file");

            let cached = repo
                .get(file)
                .await
                .map_err(|e| hub_err(format!("Failed to download {}: {}", file, e)))?;

            link_into(&cached, &target_dir.join(file)).await?;
        }

        tracing::info!(
            model_id = %model_id,
            files = info.siblings.len(),
            "Model download complete"
        );

        Ok(())
    }
}

/// Place a cached (possibly symlinked) file at `dest` without duplicating it
///
/// Hard-links the resolved cache blob, falls back to a symlink to it, and only
/// copies the bytes when neither link can be made (e.g. across filesystems on
/// a platform without symlinks). An existing `dest` is replaced.
async fn link_into(cached: &Path, dest: &Path) -> ModelResult<()> {
    let write_err = |path: &Path, source| ModelError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| write_err(parent, source))?;
    }

    // Snapshot entries are symlinks into blobs/; link the blob itself
    let blob = tokio::fs::canonicalize(cached).await?;

    match tokio::fs::remove_file(dest).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(source) => return Err(write_err(dest, source)),
    }

    match tokio::fs::hard_link(&blob, dest).await {
        Ok(()) => return Ok(()),
        Err(e) => tracing::debug!(dest = ?dest, error = %e, "Hard link failed, trying symlink"),
    }

    #[cfg(unix)]
    match tokio::fs::symlink(&blob, dest).await {
        Ok(()) => return Ok(()),
        Err(e) => tracing::debug!(dest = ?dest, error = %e, "Symlink failed, copying"),
    }

    tokio::fs::copy(&blob, dest)
        .await
        .map_err(|source| write_err(dest, source))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_client_creation() {
        let client = HubClient::connect(None);
        assert!(client.is_ok());
        assert_eq!(client.unwrap().name(), "hf-hub");
    }

    #[tokio::test]
    async fn test_client_with_cache_dir() {
        let temp_dir = TempDir::new().unwrap();
        let client = HubClient::connect_with_cache(temp_dir.path().to_path_buf(), None);
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_link_into_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("blob");
        std::fs::write(&src, "weights").unwrap();

        let dest = temp_dir.path().join("org--model/onnx/model.onnx");
        link_into(&src, &dest).await.unwrap();

        assert_eq!(std::fs::read_to_string(dest).unwrap(), "weights");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_link_into_shares_inode_with_blob() {
        use std::os::unix::fs::MetadataExt;

        let temp_dir = TempDir::new().unwrap();
        let blob = temp_dir.path().join("blobs/abc123");
        std::fs::create_dir_all(blob.parent().unwrap()).unwrap();
        std::fs::write(&blob, "weights").unwrap();

        // Mirror the hub cache layout: snapshots/<sha>/<file> -> blobs/<hash>
        let snapshot = temp_dir.path().join("snapshots/sha/model.safetensors");
        std::fs::create_dir_all(snapshot.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(&blob, &snapshot).unwrap();

        let dest = temp_dir.path().join("models/org--model/model.safetensors");
        link_into(&snapshot, &dest).await.unwrap();

        let dest_meta = std::fs::metadata(&dest).unwrap();
        let blob_meta = std::fs::metadata(&blob).unwrap();
        assert_eq!(dest_meta.ino(), blob_meta.ino());
        assert_eq!(dest_meta.dev(), blob_meta.dev());
    }

    #[tokio::test]
    async fn test_link_into_replaces_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("blob");
        std::fs::write(&src, "new weights").unwrap();

        let dest = temp_dir.path().join("org--model/model.gguf");
        std::fs::create_dir_all(dest.parent().unwrap()).unwrap();
        std::fs::write(&dest, "stale partial").unwrap();

        link_into(&src, &dest).await.unwrap();

        assert_eq!(std::fs::read_to_string(dest).unwrap(), "new weights");
    }

    #[tokio::test]
    async fn test_link_into_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let result = link_into(
            &temp_dir.path().join("missing"),
            &temp_dir.path().join("out/file"),
        )
        .await;
        assert!(matches!(result, Err(ModelError::Io(_))));
    }

    #[tokio::test]
    #[ignore = "requires network access and downloads ~20MB"]
    async fn test_download_small_model() {
        let cache = TempDir::new().unwrap();
        let target = TempDir::new().unwrap();
        let client = HubClient::connect_with_cache(cache.path().to_path_buf(), None).unwrap();

        client
            .download("TaylorAI/gte-tiny", target.path())
            .await
            .expect("download failed");

        assert!(target.path().join("config.json").exists());
    }
}
