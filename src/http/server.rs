//! HTTP API Server for notihist
//!
//! Accepts raw artifact bodies and answers with the projected rows.

use crate::{
    api::{project_history, HistoryRows},
    parsing::{
        extract_snoozed, extract_status, read_xml_document, HistoryDecodeError, SnoozedRow,
        StatusRow, XmlError,
    },
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info};

/// Source name recorded on rows extracted from a request body
pub const UPLOAD_SOURCE: &str = "upload";

const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Query parameters of `POST /api/history/decode`
#[derive(Debug, Deserialize)]
pub struct DecodeHistoryParams {
    pub file_name: Option<String>,
}

/// Query parameters of `POST /api/settings/status`
#[derive(Debug, Deserialize)]
pub struct StatusParams {
    pub user: Option<String>,
}

/// Rows extracted from an XML body
#[derive(Debug, Serialize)]
pub struct RowsResponse<T> {
    pub rows: Vec<T>,
}

/// Generic success response
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Custom error type for API errors
#[derive(Debug)]
pub enum ApiError {
    Decode(HistoryDecodeError),
    Xml(XmlError),
    BadRequest(String),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Decode(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::Xml(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

impl From<HistoryDecodeError> for ApiError {
    fn from(err: HistoryDecodeError) -> Self {
        ApiError::Decode(err)
    }
}

impl From<XmlError> for ApiError {
    fn from(err: XmlError) -> Self {
        ApiError::Xml(err)
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Create the HTTP server with all routes
pub fn create_server() -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/api/history/decode", post(decode_history_file))
        .route("/api/settings/status", post(settings_status))
        .route("/api/policy/snoozed", post(policy_snoozed))
        .route("/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(SuccessResponse { message: "notihist HTTP API is running".to_string() })
}

/// POST /api/history/decode - Project a raw history protobuf
async fn decode_history_file(
    Query(params): Query<DecodeHistoryParams>,
    body: Bytes,
) -> Result<Json<HistoryRows>, ApiError> {
    let file_name = params
        .file_name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter: file_name".to_string()))?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("Empty request body".to_string()));
    }

    debug!(bytes = body.len(), file_name = %file_name, "decoding uploaded history file");
    let rows = tokio::task::spawn_blocking(move || project_history(&body, &file_name)).await??;
    Ok(Json(rows))
}

/// POST /api/settings/status - Extract the feature status from settings_secure.xml
async fn settings_status(
    Query(params): Query<StatusParams>,
    body: Bytes,
) -> Result<Json<RowsResponse<StatusRow>>, ApiError> {
    let user = params
        .user
        .filter(|user| !user.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Missing query parameter: user".to_string()))?;

    let rows = tokio::task::spawn_blocking(move || {
        read_xml_document(&body).map(|doc| extract_status(&doc, &user, UPLOAD_SOURCE))
    })
    .await??;
    Ok(Json(RowsResponse { rows }))
}

/// POST /api/policy/snoozed - Extract snoozed notifications from notification_policy.xml
async fn policy_snoozed(body: Bytes) -> Result<Json<RowsResponse<SnoozedRow>>, ApiError> {
    let rows = tokio::task::spawn_blocking(move || {
        read_xml_document(&body).map(|doc| extract_snoozed(&doc, UPLOAD_SOURCE))
    })
    .await??;
    Ok(Json(RowsResponse { rows }))
}

/// Start the HTTP server on the specified address
pub async fn start_server(addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let app = create_server();

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "notihist HTTP API server listening");
    println!("notihist HTTP API server listening on http://{}", addr);
    println!();
    println!("Available endpoints:");
    println!("  POST   /api/history/decode?file_name=<ms>  - Project a history protobuf");
    println!("  POST   /api/settings/status?user=<id>      - Feature status from settings_secure.xml");
    println!("  POST   /api/policy/snoozed                 - Snoozed notifications from notification_policy.xml");
    println!("  GET    /health                             - Health check");
    println!();

    axum::serve(listener, app).await?;

    Ok(())
}
