// captiond - HTTP meme captioning service with a content-addressed render cache

use anyhow::{Context, Result};
use captiond::cache::FsArtifactStore;
use captiond::cli::Args;
use captiond::config::AppConfig;
use captiond::fetch::SourceFetcher;
use captiond::render::Renderer;
use captiond::server::create_router;
use captiond::utils::logging;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Phase 1: Load configuration
    let config = AppConfig::load()?;

    // Phase 2: Initialize logging
    logging::init(&config.logging)?;
    info!("Starting captiond v{}", env!("CARGO_PKG_VERSION"));

    // Phase 3: Load the caption font (once, for the process lifetime)
    let font_bytes = std::fs::read(&config.font.path)
        .with_context(|| format!("read caption font '{}'", config.font.path))?;
    let renderer = Renderer::new(font_bytes)?;
    info!(
        "Caption font loaded from {} (family: {})",
        config.font.path,
        renderer.font_family()
    );

    // Phase 4: Open the artifact store
    let store = FsArtifactStore::open(&config.cache.dir).await?;
    info!("Artifact store ready at {}", store.root().display());

    // Phase 5: Build the outbound fetcher
    let fetcher = SourceFetcher::new(&config.fetch)?;

    if args.check {
        info!("Configuration, font, and cache directory all check out");
        return Ok(());
    }

    // Phase 6: Build and start the HTTP server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = create_router(config, store, fetcher, renderer);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Phase 7: Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }
}
