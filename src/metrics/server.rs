//! HTTP server for the processing endpoint and Prometheus metrics.
//!
//! `POST /process` takes the packed RGB bytes as the request body and the
//! dimensions as query parameters. Container formats are decoded by the
//! caller.

use crate::imaging::{RgbImage, CHANNELS};
use crate::metrics::MetricsRegistry;
use crate::pipeline::{
    ErrorBody, InputError, OutputConfig, ProcessError, ProcessPipeline, WordResponse,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

/// Errors that can occur while running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid bind address: {0}")]
    Address(String),

    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("server error: {0}")]
    Server(String),
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], 8080).into(),
            body_limit: 25_000_000 * CHANNELS,
        }
    }
}

impl ServerConfig {
    /// Creates a config with a custom port.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: ([127, 0, 0, 1], port).into(),
            ..Default::default()
        }
    }

    /// Builds a config from the `[output]` section and the pixel limit.
    pub fn from_output(output: &OutputConfig, max_pixels: u64) -> Result<Self, ServerError> {
        let bind_addr = format!("{}:{}", output.host, output.port)
            .parse()
            .map_err(|e| ServerError::Address(format!("{}:{}: {e}", output.host, output.port)))?;
        let body_limit = usize::try_from(max_pixels.saturating_mul(CHANNELS as u64))
            .unwrap_or(usize::MAX);
        Ok(Self {
            bind_addr,
            body_limit,
        })
    }
}

/// Query parameters of `POST /process`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessQuery {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Overrides the configured number of returned words.
    pub top_n: Option<usize>,
    /// Raises the shortest reported word length.
    pub min_word_length: Option<usize>,
    /// Include the generated letter string in the response.
    #[serde(default)]
    pub letters: bool,
}

#[derive(Clone)]
struct AppState {
    pipeline: Arc<ProcessPipeline>,
    registry: Arc<MetricsRegistry>,
}

/// HTTP server exposing the pipeline and its metrics.
pub struct Server {
    config: ServerConfig,
    state: AppState,
}

impl Server {
    /// Creates a new server.
    pub fn new(
        config: ServerConfig,
        pipeline: Arc<ProcessPipeline>,
        registry: Arc<MetricsRegistry>,
    ) -> Self {
        Self {
            config,
            state: AppState { pipeline, registry },
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/process", post(process_handler))
            .route("/metrics", get(metrics_handler))
            .route("/health", get(health_handler))
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(CorsLayer::permissive())
            .with_state(self.state.clone())
    }

    /// Starts the HTTP server.
    ///
    /// This method runs the server until it is shut down.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(
            addr = %self.config.bind_addr,
            body_limit = self.config.body_limit,
            "Server listening"
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        Ok(())
    }
}

/// Handler for the /process endpoint.
async fn process_handler(
    State(state): State<AppState>,
    Query(query): Query<ProcessQuery>,
    body: Bytes,
) -> Response {
    let result = if body.is_empty() {
        Err(ProcessError::from(InputError::MissingImage))
    } else {
        let image = RgbImage::new(body.to_vec(), query.width, query.height);
        let mut options = state.pipeline.defaults().clone();
        if let Some(top_n) = query.top_n {
            options.top_n = top_n;
        }
        if let Some(min) = query.min_word_length {
            options.min_word_length = min;
        }
        options.include_letter_string = query.letters;

        let pipeline = Arc::clone(&state.pipeline);
        tokio::task::spawn_blocking(move || pipeline.process_with(&image, &options))
            .await
            .unwrap_or_else(|e| Err(worker_failure(&state.registry, e)))
    };

    match result {
        Ok(outcome) => (StatusCode::OK, Json(WordResponse::from(&outcome))).into_response(),
        Err(e) => {
            if matches!(e, ProcessError::Input(InputError::MissingImage)) {
                state.registry.record_failure(e.kind());
            }
            let status =
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, Json(ErrorBody::from(&e))).into_response()
        }
    }
}

/// Converts a lost blocking task into an internal error, logging and counting it.
fn worker_failure(registry: &MetricsRegistry, err: tokio::task::JoinError) -> ProcessError {
    let err = ProcessError::Internal(format!("worker failed: {err}"));
    tracing::error!(error = %err, "Image processing worker failed");
    registry.record_failure(err.kind());
    err
}

/// Handler for the /metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.registry.encode() {
        Ok(output) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            output,
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("content-type", "text/plain; charset=utf-8")],
            format!("Failed to encode metrics: {}", e),
        ),
    }
}

/// Handler for the /health endpoint.
async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
