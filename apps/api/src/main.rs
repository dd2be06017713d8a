mod config;
mod document;
mod errors;
mod layout;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::document::store::FsDocumentStore;
use crate::layout::{PageDimensions, PatternConfig};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Genko API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize document store
    let store = FsDocumentStore::new(&config.documents_dir);
    store.ensure_root().await.with_context(|| {
        format!(
            "Cannot create documents directory {}",
            config.documents_dir.display()
        )
    })?;
    info!("Document store rooted at {}", config.documents_dir.display());

    // Layout defaults: A4 with a 165 × 245 mm writing area
    let page = PageDimensions::default();
    let pattern_config = PatternConfig {
        grid_alignment_adjust: config.grid_align_adjust_px,
        ..PatternConfig::default()
    };
    info!(
        "Layout page {:.1} × {:.1} px, grid alignment adjust {}px",
        page.width, page.height, pattern_config.grid_alignment_adjust
    );

    // Build app state
    let state = AppState {
        store: Arc::new(store),
        pattern_config: Arc::new(pattern_config),
        page,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict to the desktop shell's origin once it is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
