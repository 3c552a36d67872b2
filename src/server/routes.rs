// HTTP routes configuration

use super::handlers::{caption_handler, health_handler, metrics_handler};
use super::middleware::request_id_layers;
use crate::cache::{FsArtifactStore, InflightGuards};
use crate::config::AppConfig;
use crate::fetch::SourceFetcher;
use crate::render::Renderer;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<FsArtifactStore>,
    pub fetcher: Arc<SourceFetcher>,
    pub renderer: Arc<Renderer>,
    pub inflight: Arc<InflightGuards>,
}

pub fn create_router(
    config: AppConfig,
    store: FsArtifactStore,
    fetcher: SourceFetcher,
    renderer: Renderer,
) -> Router {
    let state = AppState {
        config,
        store: Arc::new(store),
        fetcher: Arc::new(fetcher),
        renderer: Arc::new(renderer),
        inflight: Arc::new(InflightGuards::new()),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/", get(caption_handler))
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id)
        .layer(set_request_id)
        .with_state(state)
}
