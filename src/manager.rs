//! Model inventory and download manager
//!
//! Mediates between the local models directory, an optional managed client and
//! the fallback command-line downloader. Every public operation reports its
//! own failures and returns a plain result; nothing is propagated to callers.

use crate::config::ManagerSettings;
use crate::error::ModelResult;
use crate::models::{
    CliDownloader, DEFAULT_MODEL, HubClient, ModelClient, ModelsConfig, contains_weights,
    list_local_models, local_model_dir, suggestions,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Outcome of reading the setup prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupChoice {
    Skip,
    Model(String),
}

impl SetupChoice {
    /// Interpret one line of user input
    pub fn parse(input: &str) -> Self {
        let choice = input.trim();
        if choice.is_empty() {
            Self::Model(DEFAULT_MODEL.to_string())
        } else if choice.eq_ignore_ascii_case("skip") {
            Self::Skip
        } else {
            Self::Model(choice.to_string())
        }
    }
}

pub struct ModelManager {
    settings: ManagerSettings,
    client: Option<Arc<dyn ModelClient>>,
    fallback: CliDownloader,
}

impl ModelManager {
    pub fn new(settings: ManagerSettings) -> Self {
        let fallback = CliDownloader::new(settings.downloader_binary.clone());
        Self {
            settings,
            client: None,
            fallback,
        }
    }

    /// Use a specific managed client instead of connecting to the hub
    pub fn with_client(mut self, client: Arc<dyn ModelClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn models_dir(&self) -> &Path {
        &self.settings.models_dir
    }

    pub fn config_file(&self) -> &Path {
        &self.settings.config_file
    }

    pub fn has_client(&self) -> bool {
        self.client.is_some()
    }

    /// Obtain the managed client
    ///
    /// A client is only ever set once per manager; later calls report the
    /// existing state without reconnecting.
    pub async fn connect(&mut self) -> bool {
        if self.client.is_some() {
            return true;
        }

        if !self.settings.use_hub_client {
            tracing::info!("Managed hub client disabled, using fallback downloader");
            eprintln!(
                "Managed hub client disabled; downloads will use '{}'",
                self.fallback.binary()
            );
            return false;
        }

        let token = self.settings.hub_token.clone();
        let connected = match &self.settings.hub_cache_dir {
            Some(cache_dir) => HubClient::connect_with_cache(cache_dir.clone(), token),
            None => HubClient::connect(token),
        };

        match connected {
            Ok(client) => {
                tracing::debug!(client = client.name(), "Connected managed client");
                self.client = Some(Arc::new(client));
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot connect managed client");
                eprintln!("Cannot connect to model hub: {e}");
                false
            }
        }
    }

    /// Weight files under the models directory, relative to it
    pub fn list_local_models(&self) -> Vec<PathBuf> {
        list_local_models(&self.settings.models_dir)
    }

    /// Download a model using the managed client if present, else the fallback tool
    ///
    /// Returns the local directory the model was downloaded into.
    pub async fn try_download(&self, model_id: &str) -> ModelResult<PathBuf> {
        let target_dir = local_model_dir(&self.settings.models_dir, model_id);

        match &self.client {
            Some(client) => {
                tracing::info!(model_id = %model_id, client = client.name(), "Downloading with managed client");
                client.download(model_id, &target_dir).await?;

                // TODO: fail the download instead of warning once the hub listing
                // can tell apart repos that legitimately ship no weight files.
                if !contains_weights(&target_dir) {
                    tracing::warn!(
                        model_id = %model_id,
                        target_dir = ?target_dir,
                        "Managed client reported success but no weight files were found"
                    );
                }
            }
            None => {
                tracing::info!(
                    model_id = %model_id,
                    binary = %self.fallback.binary(),
                    "Downloading with fallback downloader"
                );
                self.fallback.download(model_id, &target_dir).await?;
            }
        }

        Ok(target_dir)
    }

    /// Download a model, reporting progress and failures to stdout
    pub async fn download_model(&self, model_id: &str) -> bool {
        let mut stdout = std::io::stdout();
        self.download_model_to(model_id, &mut stdout).await
    }

    /// Download a model, reporting progress and failures to `output`
    pub async fn download_model_to<W: Write>(&self, model_id: &str, output: &mut W) -> bool {
        let _ = writeln!(output, "\nDownloading model: {model_id}");
        let _ = writeln!(output, "Downloading...");
        let _ = output.flush();

        match self.try_download(model_id).await {
            Ok(dir) => {
                let _ = writeln!(output, "Downloaded! ({})", dir.display());
                true
            }
            Err(e) => {
                tracing::error!(model_id = %model_id, error = %e, "Download failed");
                let _ = writeln!(output, "Download failed: {e}");
                false
            }
        }
    }

    /// Interactive default-model setup on stdin/stdout
    pub async fn setup_default_model(&self) -> Option<String> {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        self.setup_default_model_with(stdin.lock(), &mut stdout)
            .await
    }

    /// Interactive default-model setup on the given streams
    ///
    /// Single pass: show suggestions, read one line, download, persist. Returns
    /// the chosen model only when it was downloaded and saved as default.
    pub async fn setup_default_model_with<R, W>(&self, input: R, output: &mut W) -> Option<String>
    where
        R: BufRead,
        W: Write,
    {
        let choice = match prompt_choice(input, output) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read model choice");
                let _ = writeln!(output, "Model setup failed: {e}");
                return None;
            }
        };

        let model_id = match choice {
            SetupChoice::Skip => {
                let _ = writeln!(
                    output,
                    "Skipping model setup. You can run 'panda model setup' later."
                );
                return None;
            }
            SetupChoice::Model(model_id) => model_id,
        };

        if !self.download_model_to(&model_id, output).await {
            let _ = writeln!(
                output,
                "Model setup failed. You can try again with 'panda model setup'"
            );
            return None;
        }

        if let Err(e) = ModelsConfig::new(&model_id)
            .save(&self.settings.config_file)
            .await
        {
            tracing::error!(error = %e, path = ?self.settings.config_file, "Failed to save default model");
            let _ = writeln!(output, "Model setup failed: {e}");
            return None;
        }

        tracing::info!(model_id = %model_id, "Default model configured");
        let _ = writeln!(output, "\nModel '{model_id}' set as default!");
        let _ = writeln!(output, "\nYou're ready to use CLI Panda!");
        let _ = writeln!(output, "Try: panda 'explain git rebase'");

        Some(model_id)
    }

    /// Currently configured default model, if any
    pub async fn default_model(&self) -> ModelResult<Option<String>> {
        Ok(ModelsConfig::load(&self.settings.config_file)
            .await?
            .map(|c| c.default_model))
    }
}

fn prompt_choice<R: BufRead, W: Write>(mut input: R, output: &mut W) -> std::io::Result<SetupChoice> {
    writeln!(output, "\nCLI Panda Model Setup")?;
    writeln!(output, "\nCLI Panda can work with local LLM models.")?;
    writeln!(
        output,
        "We recommend small, fast models optimized for Apple Silicon.\n"
    )?;
    writeln!(output, "Suggested Models")?;
    write!(output, "{}", suggestions::render_table())?;
    writeln!(output, "\nYou can:")?;
    writeln!(
        output,
        "1. Enter a HuggingFace model ID (e.g., {DEFAULT_MODEL})"
    )?;
    writeln!(output, "2. Press Enter to use the recommended model")?;
    writeln!(output, "3. Type 'skip' to configure later\n")?;
    write!(output, "Model choice ({DEFAULT_MODEL}): ")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        // Closed stdin means nobody is there to choose
        writeln!(output)?;
        return Ok(SetupChoice::Skip);
    }
    Ok(SetupChoice::parse(&line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> ManagerSettings {
        ManagerSettings {
            models_dir: dir.path().join("models"),
            config_file: dir.path().join("config/models.json"),
            downloader_binary: "false".to_string(),
            use_hub_client: false,
            hub_cache_dir: None,
            hub_token: None,
        }
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(
            SetupChoice::parse("\n"),
            SetupChoice::Model(DEFAULT_MODEL.to_string())
        );
        assert_eq!(
            SetupChoice::parse(""),
            SetupChoice::Model(DEFAULT_MODEL.to_string())
        );
        assert_eq!(SetupChoice::parse("skip\n"), SetupChoice::Skip);
        assert_eq!(SetupChoice::parse("  SKIP "), SetupChoice::Skip);
        assert_eq!(SetupChoice::parse("SkIp"), SetupChoice::Skip);
        assert_eq!(
            SetupChoice::parse(" org/model \n"),
            SetupChoice::Model("org/model".to_string())
        );
    }

    #[test]
    fn test_prompt_shows_suggestions() {
        let mut out = Vec::new();
        let choice = prompt_choice(Cursor::new("skip\n"), &mut out).unwrap();
        assert_eq!(choice, SetupChoice::Skip);

        let text = String::from_utf8(out).unwrap();
        for s in &crate::models::MODEL_SUGGESTIONS {
            assert!(text.contains(s.model_id));
        }
        assert!(text.contains("Model choice"));
    }

    #[test]
    fn test_prompt_eof_skips() {
        let mut out = Vec::new();
        let choice = prompt_choice(Cursor::new(""), &mut out).unwrap();
        assert_eq!(choice, SetupChoice::Skip);
    }

    #[test]
    fn test_prompt_blank_line_selects_default() {
        let mut out = Vec::new();
        let choice = prompt_choice(Cursor::new("\n"), &mut out).unwrap();
        assert_eq!(choice, SetupChoice::Model(DEFAULT_MODEL.to_string()));
    }

    #[tokio::test]
    async fn test_connect_disabled_reports_failure() {
        let dir = TempDir::new().unwrap();
        let mut manager = ModelManager::new(settings_in(&dir));
        assert!(!manager.connect().await);
        assert!(!manager.has_client());
    }

    #[tokio::test]
    async fn test_connect_hub_client() {
        let dir = TempDir::new().unwrap();
        let mut manager = ModelManager::new(ManagerSettings {
            use_hub_client: true,
            ..settings_in(&dir)
        });
        assert!(manager.connect().await);
        assert!(manager.has_client());
        // Second call keeps the existing client
        assert!(manager.connect().await);
    }

    #[tokio::test]
    async fn test_connect_hub_client_with_cache_dir() {
        let dir = TempDir::new().unwrap();
        let mut manager = ModelManager::new(ManagerSettings {
            use_hub_client: true,
            hub_cache_dir: Some(dir.path().join("hf-cache")),
            ..settings_in(&dir)
        });
        assert!(manager.connect().await);
        assert!(manager.has_client());
    }

    #[tokio::test]
    async fn test_download_reports_to_writer() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::new(ManagerSettings {
            downloader_binary: "/nonexistent/hf-cli-12345".to_string(),
            ..settings_in(&dir)
        });

        let mut out = Vec::new();
        assert!(!manager.download_model_to("org/model", &mut out).await);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Downloading model: org/model"));
        assert!(text.contains("Download failed"));
    }

    #[test]
    fn test_paths_come_from_settings() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::new(settings_in(&dir));
        assert_eq!(manager.models_dir(), dir.path().join("models"));
        assert_eq!(manager.config_file(), dir.path().join("config/models.json"));
    }

    #[tokio::test]
    async fn test_default_model_absent() {
        let dir = TempDir::new().unwrap();
        let manager = ModelManager::new(settings_in(&dir));
        assert_eq!(manager.default_model().await.unwrap(), None);
    }
}
