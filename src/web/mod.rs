// Web server: Axum JSON API over the pipeline facade.
//
// All /api/* routes take and return JSON. Core input errors map to 4xx,
// collaborator failures to 502 (or 504 when the call timed out), so clients
// can tell a bad request from an outage.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::TopicError;
use crate::pipeline::Pipeline;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            started_at: Utc::now(),
        }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(pipeline: Pipeline, port: u16, bind: &str) -> Result<()> {
    let app = build_router(AppState::new(pipeline));

    let addr = format!("{bind}:{port}");
    info!("newsprism API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/keywords", post(handlers::keywords::extract_keywords))
        .route("/api/topics", post(handlers::topics::analyze_topics))
        .route("/api/topics/urls", post(handlers::topics::analyze_urls))
        .route("/api/article", post(handlers::articles::fetch_article))
        .route("/api/search", post(handlers::articles::search))
        .route("/api/summarize", post(handlers::nlp::summarize))
        .route("/api/translate", post(handlers::nlp::translate))
        .route("/api/sentiment", post(handlers::nlp::sentiment))
        .route("/api/entities", post(handlers::nlp::entities));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check: always returns 200 OK.
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        axum::Json(serde_json::json!({
            "status": "Server is up and running",
            "started_at": state.started_at.to_rfc3339(),
        })),
    )
}

/// Kind reported for request validation failures outside `TopicError`.
pub const BAD_REQUEST_KIND: &str = "bad_request";

/// JSON error body `{error, kind}` for failures that aren't a `TopicError`.
pub fn api_error(status: StatusCode, kind: &str, message: &str) -> Response {
    (
        status,
        axum::Json(serde_json::json!({ "error": message, "kind": kind })),
    )
        .into_response()
}

/// HTTP status for a pipeline error.
pub fn status_for(err: &TopicError) -> StatusCode {
    match err {
        TopicError::Ranking { .. }
        | TopicError::ClusteringConfig(_)
        | TopicError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
        TopicError::DimensionMismatch { .. } | TopicError::MissingEmbedding { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TopicError::Upstream { .. } if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
        TopicError::Upstream { .. } => StatusCode::BAD_GATEWAY,
    }
}

/// JSON error body carrying the message and a stable error kind.
pub fn topic_error(err: &TopicError) -> Response {
    let status = status_for(err);
    if err.is_core() {
        warn!(kind = err.kind(), error = %err, "Rejected request");
    } else {
        error!(kind = err.kind(), error = %err, "Upstream call failed");
    }
    (
        status,
        axum::Json(serde_json::json!({
            "error": err.to_string(),
            "kind": err.kind(),
        })),
    )
        .into_response()
}
