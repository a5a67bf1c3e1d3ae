//! Settings structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Settings for the model manager
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ManagerSettings {
    /// Directory scanned for local model weights
    pub models_dir: PathBuf,
    /// JSON document holding the default model
    pub config_file: PathBuf,
    /// Command-line downloader used when the hub client is unavailable
    pub downloader_binary: String,
    /// Whether `connect()` may build the managed hub client
    pub use_hub_client: bool,
    /// HuggingFace cache used by the hub client, hf-hub's default when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hub_cache_dir: Option<PathBuf>,

    /// Read from `HF_TOKEN` only
    #[serde(skip)]
    pub hub_token: Option<String>,
}

impl Default for ManagerSettings {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            config_file: default_config_file(),
            downloader_binary: default_downloader_binary(),
            use_hub_client: true,
            hub_cache_dir: None,
            hub_token: None,
        }
    }
}

impl ManagerSettings {
    /// Load settings from an optional TOML file with environment variable overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut settings = if let Some(path) = path {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {:?}", path))?;
            toml::from_str(&content).context("Failed to parse TOML settings")?
        } else {
            Self::default()
        };

        // Environment variable overrides
        if let Ok(dir) = std::env::var("PANDA_MODELS_DIR") {
            settings.models_dir = PathBuf::from(dir);
        }
        if let Ok(file) = std::env::var("PANDA_MODELS_CONFIG") {
            settings.config_file = PathBuf::from(file);
        }
        if let Ok(binary) = std::env::var("PANDA_DOWNLOADER_BIN") {
            settings.downloader_binary = binary;
        }
        if let Ok(flag) = std::env::var("PANDA_DISABLE_HUB") {
            settings.use_hub_client = !parse_flag(&flag)
                .with_context(|| format!("Invalid PANDA_DISABLE_HUB value: {flag}"))?;
        }
        if let Ok(dir) = std::env::var("PANDA_HUB_CACHE")
            && !dir.is_empty()
        {
            settings.hub_cache_dir = Some(PathBuf::from(dir));
        }
        if let Ok(token) = std::env::var("HF_TOKEN")
            && !token.is_empty()
        {
            settings.hub_token = Some(token);
        }

        Ok(settings)
    }

    /// Validate settings
    pub fn validate(&self) -> Result<()> {
        if self.downloader_binary.trim().is_empty() {
            anyhow::bail!("Downloader binary cannot be empty");
        }

        if self.models_dir.exists() && !self.models_dir.is_dir() {
            anyhow::bail!(
                "Models path {:?} exists but is not a directory",
                self.models_dir
            );
        }

        if self.config_file.is_dir() {
            anyhow::bail!("Models config {:?} is a directory", self.config_file);
        }

        Ok(())
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{other}'"),
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

// Default functions
fn default_models_dir() -> PathBuf {
    home_dir().join(".lmstudio").join("models")
}
fn default_config_file() -> PathBuf {
    home_dir()
        .join(".config")
        .join("cli-panda")
        .join("models.json")
}
fn default_downloader_binary() -> String {
    "huggingface-cli".to_string()
}
