//! Local model inventory
//!
//! Scans the models directory for weight files. Layout written by both download
//! paths:
//! ```text
//! ~/.lmstudio/models/
//! ├── LibraxisAI--qwen3-8b-MLX-Q5/
//! │   ├── config.json
//! │   └── model.safetensors
//! └── lmstudio-community/
//!     └── Phi-3.5-mini-instruct-GGUF/
//!         └── Phi-3.5-mini-instruct-Q4_K_M.gguf
//! ```

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recognized weight file extensions, scanned in this order
pub const WEIGHT_EXTENSIONS: [&str; 2] = ["gguf", "safetensors"];

/// List weight files under `models_dir`, relative to it
///
/// Runs one traversal per extension in [`WEIGHT_EXTENSIONS`] order. Results keep
/// traversal order within each pass and are neither sorted nor deduplicated.
/// A missing directory yields an empty list.
pub fn list_local_models(models_dir: &Path) -> Vec<PathBuf> {
    if !models_dir.is_dir() {
        return Vec::new();
    }

    let mut models = Vec::new();
    for extension in WEIGHT_EXTENSIONS {
        models.extend(scan_extension(models_dir, extension));
    }

    tracing::debug!(
        models_dir = ?models_dir,
        count = models.len(),
        "Scanned local models"
    );

    models
}

/// Check whether a directory holds at least one recognized weight file
pub fn contains_weights(dir: &Path) -> bool {
    !list_local_models(dir).is_empty()
}

fn scan_extension(root: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == extension))
        .map(|e| e.path().strip_prefix(root).unwrap_or(e.path()).to_path_buf())
        .collect()
}
