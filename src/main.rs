use anyhow::Context;
use clap::Parser;
use geo_discovery::catalog::grid::GeoGrid;
use geo_discovery::catalog::loader::load_seed_file;
use geo_discovery::catalog::memory::InMemoryCatalog;
use geo_discovery::catalog::remote::HttpCatalog;
use geo_discovery::catalog::store::CatalogStore;
use geo_discovery::config::AppConfig;
use geo_discovery::search::engine::{SearchEngine, SearchSettings};
use geo_discovery::search::handlers::router;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Nearby-places discovery service.
#[derive(Debug, Parser)]
#[command(name = "geo-discovery", version)]
struct Args {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to serve HTTP on (overrides the config file).
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// JSON file of catalog entities to preload into the in-memory catalog.
    #[arg(long)]
    seed: Option<PathBuf>,

    /// Base URL of the catalog service; switches to the HTTP backend.
    #[arg(long)]
    catalog_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    // 1. Configuration:
    let mut config = AppConfig::load(args.config.as_deref()).context("loading configuration")?;
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(seed) = args.seed {
        config.catalog.seed_path = Some(seed);
    }
    if let Some(url) = args.catalog_url {
        config.catalog.remote_url = Some(url);
    }
    config.validate()?;

    // 2. Catalog backend:
    let catalog = build_catalog(&config)?;
    tracing::info!("Catalog backend: {}", catalog.backend());

    // 3. Search engine + HTTP router:
    let engine = Arc::new(SearchEngine::new(catalog, SearchSettings::from(&config)));
    let app = router(engine);

    // 4. Start HTTP server:
    let listener = tokio::net::TcpListener::bind(config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;

    tracing::info!("HTTP server listening on {}", config.server.bind);
    tracing::info!("Press Ctrl+C to shutdown");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_catalog(config: &AppConfig) -> anyhow::Result<Arc<dyn CatalogStore>> {
    if let Some(url) = &config.catalog.remote_url {
        let timeout = Duration::from_millis(config.search.catalog_timeout_ms);
        tracing::info!("Using remote catalog at {}", url);
        return Ok(Arc::new(
            HttpCatalog::new(url, timeout).with_max_body_bytes(config.catalog.max_response_bytes),
        ));
    }

    let catalog = InMemoryCatalog::new(GeoGrid::new(config.catalog.grid_cell_deg), config.region);
    match &config.catalog.seed_path {
        Some(path) => {
            let report = load_seed_file(path, &catalog)
                .with_context(|| format!("loading seed file {}", path.display()))?;
            tracing::info!(
                "Seeded in-memory catalog: {} loaded, {} skipped",
                report.loaded,
                report.skipped
            );
        }
        None => tracing::warn!("No seed file configured; starting with an empty catalog"),
    }
    Ok(Arc::new(catalog))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
