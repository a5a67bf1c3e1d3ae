//! Error types for model management operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while scanning, downloading or persisting models
#[derive(Debug, Error)]
pub enum ModelError {
    /// The managed hub client could not be constructed
    #[error("managed client unavailable: {0}")]
    ClientUnavailable(String),

    /// The managed hub client failed while downloading
    #[error("hub download failed for {model_id}: {message}")]
    Hub { model_id: String, message: String },

    /// The fallback downloader binary could not be started
    #[error("failed to spawn downloader '{binary}': {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The fallback downloader ran but exited non-zero
    #[error("downloader exited with {status}: {stderr}")]
    DownloaderFailed { status: String, stderr: String },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid models config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ModelResult<T> = Result<T, ModelError>;
