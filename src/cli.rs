//! Command-line surface and top-level entry points

use crate::config::ManagerSettings;
use crate::manager::ModelManager;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "panda-model")]
#[command(about = "Manage local LLM models for CLI Panda", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path to a TOML settings file
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Choose, download and save a default model (default action)
    Setup,
    /// List locally available models
    List,
    /// Download a model without changing the default
    Download {
        /// HuggingFace model ID, e.g. "mlx-community/Llama-3.2-3B-Instruct-4bit"
        model_id: String,
    },
    /// Show the configured default model
    Current,
}

/// Parse arguments, set up logging and run the requested command
pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);
    run(cli).await
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings = ManagerSettings::load(cli.settings)?;
    settings.validate()?;

    tracing::debug!(
        models_dir = ?settings.models_dir,
        config_file = ?settings.config_file,
        downloader = %settings.downloader_binary,
        use_hub_client = settings.use_hub_client,
        "Settings loaded"
    );

    match cli.command.unwrap_or(Command::Setup) {
        Command::Setup => {
            setup_model(settings).await;
        }
        Command::List => {
            list_models(settings);
        }
        Command::Download { model_id } => {
            if !download_model(settings, &model_id).await {
                anyhow::bail!("Download of '{model_id}' failed");
            }
        }
        Command::Current => show_default_model(settings).await?,
    }

    Ok(())
}

fn init_logging(level: &str, format: &str) {
    match format {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(level)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// Run the interactive setup with a freshly connected manager
pub async fn setup_model(settings: ManagerSettings) -> Option<String> {
    let mut manager = ModelManager::new(settings);
    manager.connect().await;
    manager.setup_default_model().await
}

/// Print the local model inventory
pub fn list_models(settings: ManagerSettings) -> Vec<PathBuf> {
    let manager = ModelManager::new(settings);
    let models = manager.list_local_models();

    if models.is_empty() {
        println!("No local models found. Run 'panda model setup' to download one.");
    } else {
        println!("\nLocal Models:");
        for model in &models {
            println!("  • {}", model.display());
        }
    }

    models
}

/// Download a single model with a freshly connected manager
pub async fn download_model(settings: ManagerSettings, model_id: &str) -> bool {
    let mut manager = ModelManager::new(settings);
    manager.connect().await;
    manager.download_model(model_id).await
}

async fn show_default_model(settings: ManagerSettings) -> Result<()> {
    let manager = ModelManager::new(settings);
    let current = manager
        .default_model()
        .await
        .with_context(|| format!("Failed to read {:?}", manager.config_file()))?;

    match current {
        Some(model_id) => println!("{model_id}"),
        None => println!("No default model configured. Run 'panda model setup' to choose one."),
    }

    Ok(())
}
