// HTTP request handlers

use super::routes::AppState;
use crate::cache::fingerprint;
use crate::error::CaptionError;
use crate::metrics;
use crate::models::{CaptionColor, CaptionRequest};
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Wire form of a caption request.
#[derive(Debug, Deserialize)]
pub struct CaptionParams {
    /// Source image URL. Defaults to empty; an empty source fails the
    /// fetch with "Invalid URL" rather than being rejected up front.
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub top: String,

    #[serde(default)]
    pub bottom: String,

    /// Present with a non-empty value selects white captions; anything
    /// else selects black.
    #[serde(default)]
    pub white: Option<String>,
}

impl From<CaptionParams> for CaptionRequest {
    fn from(params: CaptionParams) -> Self {
        let color = match params.white.as_deref() {
            Some(flag) if !flag.is_empty() => CaptionColor::White,
            _ => CaptionColor::Black,
        };
        CaptionRequest::new(params.source, params.top, params.bottom, color)
    }
}

fn png_response(bytes: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "image/png")], bytes).into_response()
}

/// Handler for the captioning endpoint.
///
/// Control flow per request: fingerprint, store read (hit → replay), else
/// render under the per-key in-flight guard, persist best-effort, respond.
/// Only successful renders are ever cached.
pub async fn caption_handler(
    State(state): State<AppState>,
    Query(params): Query<CaptionParams>,
) -> Result<Response, CaptionError> {
    let started = Instant::now();
    let req = CaptionRequest::from(params);
    let key = fingerprint(&req);

    if let Some(cached) = state.store.read(&key).await {
        metrics::record_cache_hit();
        debug!(key = %key, "served from cache");
        metrics::record_request("/", 200, started.elapsed().as_secs_f64());
        return Ok(png_response(cached));
    }

    // Collapse concurrent identical misses into a single render. Whoever
    // holds the guard renders; everyone else re-checks the store after
    // waiting and replays the freshly written artifact.
    let _guard = state.inflight.acquire(&key).await;
    if let Some(cached) = state.store.read(&key).await {
        metrics::record_cache_hit();
        debug!(key = %key, "served from cache after awaiting identical render");
        metrics::record_request("/", 200, started.elapsed().as_secs_f64());
        return Ok(png_response(cached));
    }

    metrics::record_cache_miss();
    let rendered = match state.renderer.generate(&req, &state.fetcher).await {
        Ok(bytes) => bytes,
        Err(e) => {
            info!(key = %key, error = ?e, "caption pipeline failed");
            metrics::record_request("/", e.status().as_u16(), started.elapsed().as_secs_f64());
            return Err(e);
        }
    };

    // Best-effort persist: a failed write is logged and counted, never
    // surfaced; the freshly rendered bytes still go out.
    match state.store.write(&key, &rendered).await {
        Ok(()) => metrics::record_cache_write(),
        Err(e) => {
            warn!(key = %key, error = %e, "artifact store write failed, serving uncached result");
            metrics::record_cache_write_error();
        }
    }

    metrics::record_request("/", 200, started.elapsed().as_secs_f64());
    Ok(png_response(Bytes::from(rendered)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub checks: HashMap<String, HealthCheck>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheck {
    pub status: String,
    pub message: String,
}

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let mut checks = HashMap::new();
    let mut overall_status = HealthStatus::Healthy;

    // Check the artifact store directory
    let store_check = match tokio::fs::metadata(state.store.root()).await {
        Ok(meta) if meta.is_dir() => HealthCheck {
            status: "ok".to_string(),
            message: format!("Cache dir: {}", state.store.root().display()),
        },
        Ok(_) => {
            overall_status = HealthStatus::Unhealthy;
            HealthCheck {
                status: "error".to_string(),
                message: "Cache path is not a directory".to_string(),
            }
        }
        Err(e) => {
            overall_status = HealthStatus::Degraded;
            HealthCheck {
                status: "warning".to_string(),
                message: format!("Cache dir inaccessible: {}", e),
            }
        }
    };
    checks.insert("artifact_store".to_string(), store_check);

    // Check the caption font (loaded at startup, so presence is enough)
    let font_check = HealthCheck {
        status: "ok".to_string(),
        message: format!("Font family: {}", state.renderer.font_family()),
    };
    checks.insert("caption_font".to_string(), font_check);

    // Check configuration
    let config_check = HealthCheck {
        status: "ok".to_string(),
        message: format!(
            "Listening on {}:{}",
            state.config.server.host, state.config.server.port
        ),
    };
    checks.insert("configuration".to_string(), config_check);

    Json(HealthResponse {
        status: overall_status,
        checks,
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn metrics_handler() -> impl IntoResponse {
    metrics::gather_metrics()
}
