//! HTTP relay between the browser UI and the upstream service.
//!
//! Two JSON routes are forwarded one-to-one; everything else is served
//! from the static asset directory.

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::{path::Path, sync::Arc};
use thiserror::Error;
use tokio::{net::TcpListener, signal};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    Config, Question,
    upstream::{HttpUpstream, UpstreamService},
};

pub const TEMPERATURE_FAILURE: &str = "Failed to fetch temperature data";
pub const ASK_FAILURE: &str = "Failed to get response from LLM";

/// Shared relay state.
#[derive(Clone, Debug)]
pub struct RelayState {
    pub upstream: Arc<dyn UpstreamService>,
}

impl RelayState {
    pub fn new(upstream: Arc<dyn UpstreamService>) -> Self {
        Self { upstream }
    }
}

/// Failures surfaced to the browser. The underlying cause is logged, never sent.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RelayError {
    #[error("{}", TEMPERATURE_FAILURE)]
    Temperature,

    #[error("{}", ASK_FAILURE)]
    Ask,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

async fn temperature(State(state): State<RelayState>) -> Response {
    match state.upstream.temperature().await {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching temperature");
            RelayError::Temperature.into_response()
        }
    }
}

/// Any body is accepted. Non-JSON content types and unparsable JSON
/// forward as `{}` rather than being rejected here.
fn question_from_request(headers: &HeaderMap, body: &[u8]) -> Question {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    if !is_json {
        return Question::default();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(value) => Question::from_body(Some(&value)),
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed question body");
            Question::default()
        }
    }
}

async fn ask(State(state): State<RelayState>, headers: HeaderMap, body: Bytes) -> Response {
    let question = question_from_request(&headers, &body);
    tracing::info!(query = ?question.query, "Received question");

    match state.upstream.ask(&question).await {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error asking LLM");
            RelayError::Ask.into_response()
        }
    }
}

pub fn build_router(state: RelayState, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/api/temperature", get(temperature))
        .route("/api/ask", post(ask))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind on all interfaces and serve until Ctrl+C / SIGTERM.
pub async fn serve(config: &Config) -> std::io::Result<()> {
    let upstream = HttpUpstream::new(config.api_url.clone());
    tracing::info!(upstream = %upstream.base_url(), "Forwarding to upstream service");

    let state = RelayState::new(Arc::new(upstream));
    let app = build_router(state, &config.static_dir);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        tracing::error!("Failed to bind relay listener to {}: {}", addr, e);
        e
    })?;
    tracing::info!("Web server running on http://localhost:{}", config.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
