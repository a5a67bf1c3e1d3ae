//! Model management module
//!
//! Provides functionality for:
//! - Scanning the local models directory for weight files
//! - Downloading models from HuggingFace Hub via hf-hub
//! - Falling back to a Hub command-line downloader
//! - Persisting the default model choice

pub mod client;
pub mod fallback;
pub mod inventory;
pub mod store;
pub mod suggestions;

pub use client::{HubClient, ModelClient};
pub use fallback::{CliDownloader, local_dir_name, local_model_dir};
pub use inventory::{WEIGHT_EXTENSIONS, contains_weights, list_local_models};
pub use store::ModelsConfig;
pub use suggestions::{DEFAULT_MODEL, MODEL_SUGGESTIONS, ModelSuggestion};
