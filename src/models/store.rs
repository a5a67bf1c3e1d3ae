//! Persisted default-model document
//!
//! Stored as `{"default_model": "<model id>"}` and read by the chat application
//! to pick its inference target.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub default_model: String,
}

impl ModelsConfig {
    pub fn new(default_model: impl Into<String>) -> Self {
        Self {
            default_model: default_model.into(),
        }
    }

    /// Load the document, `None` if the file does not exist
    pub async fn load(path: &Path) -> ModelResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&content)?;

        tracing::debug!(path = ?path, default_model = %config.default_model, "Models config loaded");

        Ok(Some(config))
    }

    /// Replace the document at `path`, creating parent directories
    pub async fn save(&self, path: &Path) -> ModelResult<()> {
        let write_err = |source| ModelError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let content = serde_json::to_string_pretty(self)?;

        // Atomic write: write to temp file, then rename
        let temp_file = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_file).await.map_err(write_err)?;
        file.write_all(content.as_bytes())
            .await
            .map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        fs::rename(&temp_file, path).await.map_err(write_err)?;

        tracing::debug!(path = ?path, default_model = %self.default_model, "Models config saved");

        Ok(())
    }
}
