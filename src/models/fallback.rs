//! Fallback downloader that shells out to a Hub command-line tool
//!
//! Used when the managed hub client is unavailable. Invokes
//! `<binary> download <model_id> --local-dir <dir>` and judges the result by
//! exit status alone.

use crate::error::{ModelError, ModelResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Convert a model ID into a filesystem-safe directory name
///
/// e.g., "LibraxisAI/qwen3-8b-MLX-Q5" -> "LibraxisAI--qwen3-8b-MLX-Q5"
pub fn local_dir_name(model_id: &str) -> String {
    model_id.replace(['/', '\\'], "--")
}

/// Directory a model is downloaded into under `models_dir`
pub fn local_model_dir(models_dir: &Path, model_id: &str) -> PathBuf {
    models_dir.join(local_dir_name(model_id))
}

/// Runs an external downloader as a subprocess
#[derive(Debug, Clone)]
pub struct CliDownloader {
    binary: String,
}

impl CliDownloader {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Download `model_id` into `target_dir`
    ///
    /// Waits for the process to exit. Partial output is left in place on failure.
    pub async fn download(&self, model_id: &str, target_dir: &Path) -> ModelResult<()> {
        let mut cmd = Command::new(&self.binary);

        cmd.arg("download")
            .arg(model_id)
            .arg("--local-dir")
            .arg(target_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(
            binary = %self.binary,
            model_id = %model_id,
            target_dir = ?target_dir,
            "Spawning fallback downloader"
        );

        let output = cmd.output().await.map_err(|source| ModelError::Spawn {
            binary: self.binary.clone(),
            source,
        })?;

        if output.status.success() {
            tracing::info!(model_id = %model_id, "Fallback download finished");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::error!(
            model_id = %model_id,
            status = %output.status,
            stderr = %stderr,
            "Fallback downloader failed"
        );

        Err(ModelError::DownloaderFailed {
            status: output.status.to_string(),
            stderr,
        })
    }
}
