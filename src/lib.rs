//! CLI Panda model manager
//!
//! Lists locally cached LLM weight files, downloads models from the HuggingFace
//! Hub and persists the default model used by the CLI Panda chat application.

pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod models;

pub use config::ManagerSettings;
pub use error::{ModelError, ModelResult};
pub use manager::{ModelManager, SetupChoice};
pub use models::{HubClient, ModelClient, ModelsConfig};
