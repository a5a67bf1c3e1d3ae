//! Alternate entry point, identical to `panda-model`

pub use cli_panda_models::cli::main_entry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    main_entry().await
}
