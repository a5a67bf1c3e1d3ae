//! panda-model - Main entry point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli_panda_models::cli::main_entry().await
}
