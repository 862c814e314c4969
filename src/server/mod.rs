//! HTTP surface: routes, shared state, and request handlers.

pub mod sse;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{BriefError, Result};
use crate::generation::{generate_brief, spawn_relay};
use crate::prompt::Prompt;
use crate::provider::{ProbeResponse, UpstreamClient};
use crate::render::render_pdf;
use crate::types::BriefRecord;

pub const PDF_FILENAME: &str = "brief-musical.pdf";

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    upstream: Arc<dyn UpstreamClient>,
}

impl AppState {
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self { upstream }
    }
}

/// Body of `/generate` and `/generate-stream`.
#[derive(Debug, Deserialize)]
pub struct IdeaRequest {
    #[serde(default)]
    pub idea: Option<String>,
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/generate", post(generate))
        .route("/generate-stream", post(generate_stream))
        .route("/generate-pdf", post(generate_pdf))
        .route("/test-api", get(test_api))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

async fn home() -> Json<Value> {
    Json(json!({
        "status": "API running",
        "endpoints": [
            "GET /",
            "POST /generate",
            "POST /generate-stream",
            "POST /generate-pdf",
            "GET /test-api",
        ],
    }))
}

/// Pull the idea out of a request body. Malformed bodies count as missing.
fn read_idea(body: std::result::Result<Json<IdeaRequest>, JsonRejection>) -> Result<String> {
    let Json(request) = body.map_err(|e| BriefError::validation(format!("Missing idea: {e}")))?;
    Ok(request.idea.unwrap_or_default())
}

async fn generate(
    State(state): State<AppState>,
    body: std::result::Result<Json<IdeaRequest>, JsonRejection>,
) -> Result<Json<BriefRecord>> {
    let idea = read_idea(body)?;
    let record = generate_brief(state.upstream.as_ref(), &idea).await?;
    info!(fields = record.raw().len(), "brief generated");
    Ok(Json(record))
}

async fn generate_stream(
    State(state): State<AppState>,
    body: std::result::Result<Json<IdeaRequest>, JsonRejection>,
) -> Result<Response> {
    let prompt = Prompt::compose(&read_idea(body)?)?;
    let events = spawn_relay(state.upstream.clone(), prompt);
    Ok(sse::event_stream_response(events).into_response())
}

async fn generate_pdf(body: std::result::Result<Json<Value>, JsonRejection>) -> Result<Response> {
    let record = body
        .ok()
        .and_then(|Json(value)| BriefRecord::from_value(value))
        .filter(|record| !record.is_empty())
        .ok_or_else(|| BriefError::validation("No data provided"))?;

    let bytes = tokio::task::spawn_blocking(move || render_pdf(&record))
        .await
        .map_err(|e| BriefError::Render(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{PDF_FILENAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn test_api(State(state): State<AppState>) -> Result<Json<ProbeResponse>> {
    Ok(Json(state.upstream.probe().await?))
}
