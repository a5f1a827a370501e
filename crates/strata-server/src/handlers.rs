//! REST API handlers for the Strata server

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use strata_ai::{FileRef, FileSummary};
use strata_core::AnalysisError;

use crate::pipeline::AnalysisResponse;
use crate::state::{AppState, CacheReport};

/// Error body: `{ "error": message }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidRepository(message) => Self::bad_request(message),
            other => {
                tracing::error!("Analysis failed: {}", other);
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: other.to_string(),
                }
            }
        }
    }
}

/// Which part of the graph to return.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphView {
    #[default]
    Full,
    Architecture,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub view: GraphView,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct DeepDiveRequest {
    #[serde(default, alias = "fileA")]
    pub file_a: Option<FileRef>,
    #[serde(default, alias = "fileB")]
    pub file_b: Option<FileRef>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ExplanationResponse {
    pub explanation: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Analyze a GitHub repository
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, ApiError> {
    let response = state.analyzer.analyze_url(&request.url).await?;
    let response = match request.view {
        GraphView::Full => response,
        GraphView::Architecture => response
            .architecture_view()
            .map_err(AnalysisError::from)?,
    };
    Ok(Json(response))
}

/// Summarize one file
pub async fn summarize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<FileSummary>, ApiError> {
    if request.content.is_empty() || request.filename.is_empty() {
        return Err(ApiError::bad_request("content and filename are required"));
    }
    Ok(Json(state.ai.summarize(&request.content, &request.filename).await))
}

/// Explain how two files are connected
pub async fn deep_dive(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DeepDiveRequest>,
) -> Result<Json<ExplanationResponse>, ApiError> {
    let (Some(file_a), Some(file_b)) = (request.file_a, request.file_b) else {
        return Err(ApiError::bad_request("Both file_a and file_b are required"));
    };
    let explanation = state.ai.explain(&file_a, &file_b).await;
    Ok(Json(ExplanationResponse { explanation }))
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}

pub async fn cache_stats(State(state): State<Arc<AppState>>) -> Json<CacheReport> {
    Json(state.caches.report())
}
