#[cfg(not(target_arch = "wasm32"))]
use anyhow::{Context, Result};
#[cfg(not(target_arch = "wasm32"))]
use tracing::{info, warn};
#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::EnvFilter;

#[cfg(not(target_arch = "wasm32"))]
use portfolio_site::{
    loader::load_catalog,
    server::{start_server, AppState},
    settings::Settings,
};

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("portfolio_site=info,tower_http=info")),
        )
        .init();

    info!("Portfolio site v{} starting...", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("Failed to load settings")?;
    info!("Data file: {}", settings.data_file.display());
    info!("Site directory: {}", settings.site_dir.display());

    // Pages read the data on every request; this only reports problems early
    match load_catalog(&settings.data_file).await {
        Ok(catalog) => info!("{} projects available", catalog.projects.len()),
        Err(e) => warn!("Project data not usable yet: {}", e),
    }

    start_server(AppState::new(settings)).await
}

// The wasm build only ships the lightbox host from the library
#[cfg(target_arch = "wasm32")]
fn main() {}
