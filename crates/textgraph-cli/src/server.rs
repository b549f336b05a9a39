//! HTTP service exposing the graph pipeline.
//!
//! - `POST /graph` takes `{ "text": string, "options"?: PipelineOptions }` and
//!   answers with the [`GraphResult`](textgraph::GraphResult) JSON.
//! - `GET /health` answers `ok`.
//!
//! Failures are `{ "error": string, "stage"?: string }` with a status derived
//! from the failing stage. Error messages are generic; details only go to the
//! log.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use textgraph::{
    CancelToken, Pipeline, PipelineError, PipelineOptions, Stage, config::AppConfig,
    raster::Rasterizer,
};
use textgraph_extract::ChatModel;

use crate::error::CliError;

/// Shared, immutable service dependencies.
#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    model: Arc<dyn ChatModel>,
    rasterizer: Arc<dyn Rasterizer>,
    shutdown: CancelToken,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        model: Arc<dyn ChatModel>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            model,
            rasterizer,
            shutdown: CancelToken::new(),
        }
    }

    /// Token cancelled when the server shuts down; in-flight runs observe it
    pub fn shutdown_token(&self) -> &CancelToken {
        &self.shutdown
    }

    fn pipeline(&self, options: Option<&PipelineOptions>) -> Pipeline {
        let pipeline = Pipeline::new(
            AppConfig::clone(&self.config),
            Arc::clone(&self.model),
            Arc::clone(&self.rasterizer),
        );
        match options {
            Some(options) => pipeline.with_options(options),
            None => pipeline,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphRequest {
    text: String,
    #[serde(default)]
    options: Option<PipelineOptions>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    stage: Option<Stage>,
}

fn error_response(status: StatusCode, error: &'static str, stage: Option<Stage>) -> Response {
    (status, Json(ErrorResponse { error, stage })).into_response()
}

/// HTTP status for a failed run
fn status_for(err: &PipelineError) -> StatusCode {
    match err.stage() {
        Some(Stage::Validation) => StatusCode::BAD_REQUEST,
        Some(Stage::Extraction) => StatusCode::BAD_GATEWAY,
        Some(Stage::Layout | Stage::Render) => StatusCode::INTERNAL_SERVER_ERROR,
        None => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Builds the service router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/graph", post(graph_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// POST /graph
async fn graph_handler(
    State(state): State<AppState>,
    payload: Result<Json<GraphRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(reason = rejection.body_text(); "Rejected malformed graph request");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(Stage::Validation),
            );
        }
    };

    debug!(text_chars = request.text.chars().count(); "Graph request received");
    let pipeline = state.pipeline(request.options.as_ref());
    match pipeline
        .run_with_cancel(&request.text, state.shutdown_token())
        .await
    {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(err) => error_response(status_for(&err), err.public_message(), err.stage()),
    }
}

/// GET /health
async fn health_handler() -> &'static str {
    "ok"
}

/// Serves `state` on `addr` until Ctrl-C.
///
/// On shutdown the state's cancel token fires so in-flight runs stop at the
/// next stage boundary.
///
/// # Errors
///
/// Returns [`CliError::Io`] if the address cannot be bound or the server
/// fails.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<(), CliError> {
    let listener = TcpListener::bind(addr).await?;
    info!(addr = listener.local_addr()?.to_string(); "Listening for graph requests");

    let shutdown = state.shutdown_token().clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown requested");
                    shutdown.cancel();
                }
                Err(err) => {
                    warn!(err:err; "Failed to listen for Ctrl-C, running until killed");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
