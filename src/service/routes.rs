//! Axum routes for the topic graph service.

use axum::{
    extract::{rejection::JsonRejection, Json, Path, Query, State},
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::TopicError;
use crate::store::{PoolStats, TopicStore};
use crate::types::{TopicId, TopicPath, TopicVersion};
use crate::TOPIC_GRAPH_SCHEMA_VERSION;

use super::access::{CanRead, CanWrite};
use super::middleware::{metrics_middleware, record_path_metrics, record_tree_metrics};
use super::state::ServiceState;

/// Rejection shape shared by every handler and extractor.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of a create request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTopicRequest {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Body text.
    #[serde(default)]
    pub content: String,
    /// Any version id of the parent topic.
    #[serde(default, alias = "parent_topic_id")]
    pub parent_topic_id: Option<String>,
}

/// Body of an update request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTopicRequest {
    /// New display name.
    #[serde(default)]
    pub name: String,
    /// New body text.
    #[serde(default)]
    pub content: String,
}

/// Query string of a path request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathQuery {
    /// Where the path starts.
    #[serde(default, alias = "start_topic_id")]
    pub start_topic_id: Option<String>,
    /// Where the path ends.
    #[serde(default, alias = "end_topic_id")]
    pub end_topic_id: Option<String>,
}

/// Path search result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathResponse {
    /// Hops from start to end, inclusive.
    pub path: TopicPath,
    /// Number of edges traversed.
    pub hop_count: usize,
}

/// Service health response (detailed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded".
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Serialized schema version.
    pub schema_version: String,
    /// Whether the store answered its health probe.
    pub store_connected: bool,
    /// Connection pool statistics, when the store pools connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    /// Always "alive".
    pub status: String,
}

/// Readiness response with dependency status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Whether the service accepts traffic.
    pub ready: bool,
    /// Whether the store is reachable.
    pub store: bool,
    /// Reason when not ready.
    pub details: Option<String>,
}

/// Structured error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
    /// Additional error details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Create a new error response with code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

fn api_error(status: StatusCode, body: ErrorResponse) -> ApiError {
    if status.is_server_error() {
        tracing::error!(code = %body.code, error = %body.error, "Request failed");
    } else {
        tracing::warn!(code = %body.code, error = %body.error, "Request error");
    }
    (status, Json(body))
}

impl From<TopicError> for ErrorResponse {
    fn from(err: TopicError) -> Self {
        let code = match &err {
            TopicError::VersionNotFound(_) | TopicError::LogicalTopicNotFound(_) => "TOPIC_NOT_FOUND",
            TopicError::NoPath { .. } => "PATH_NOT_FOUND",
            TopicError::StoreError(_) => "STORE_ERROR",
        };
        Self::new(code, err.to_string())
    }
}

/// Map a core error onto its HTTP status and body.
pub fn topic_error(err: TopicError) -> ApiError {
    let status = match &err {
        TopicError::VersionNotFound(_)
        | TopicError::LogicalTopicNotFound(_)
        | TopicError::NoPath { .. } => StatusCode::NOT_FOUND,
        TopicError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, err.into())
}

fn invalid_request(message: impl Into<String>) -> ApiError {
    api_error(
        StatusCode::BAD_REQUEST,
        ErrorResponse::new("INVALID_REQUEST", message),
    )
}

fn parse_topic_id(raw: &str) -> Result<TopicId, ApiError> {
    raw.parse::<TopicId>().map_err(|e| {
        api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_TOPIC_ID", format!("Invalid topic ID: {}", e))
                .with_details(raw),
        )
    })
}

fn require_text(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(invalid_request(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(inner)| inner)
        .map_err(|rejection| invalid_request(rejection.body_text()))
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Create version 1 of a new topic.
async fn create_topic_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    CanWrite(role): CanWrite,
    payload: Result<Json<CreateTopicRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TopicVersion>), ApiError> {
    let request = body(payload)?;
    require_text("name", &request.name)?;
    require_text("content", &request.content)?;

    // An unparseable parent id can never resolve, so it is treated like
    // any other dangling parent.
    let parent = request
        .parent_topic_id
        .as_deref()
        .and_then(|raw| raw.parse::<TopicId>().ok());

    let topic = state
        .graph
        .create(request.name, request.content, parent)
        .await
        .map_err(topic_error)?;

    tracing::info!(%role, topic_id = %topic.id, logical_id = %topic.logical_id, "Topic created");
    Ok((StatusCode::CREATED, Json(topic)))
}

/// List every stored version record.
async fn list_topics_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    _role: CanRead,
) -> Result<Json<Vec<TopicVersion>>, ApiError> {
    state.graph.list_all().await.map(Json).map_err(topic_error)
}

/// Fetch one version record.
async fn get_topic_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    _role: CanRead,
    Path(raw_id): Path<String>,
) -> Result<Json<TopicVersion>, ApiError> {
    let id = parse_topic_id(&raw_id)?;
    state.graph.get(&id).await.map(Json).map_err(topic_error)
}

/// Append a new version of a topic.
async fn update_topic_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    CanWrite(role): CanWrite,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateTopicRequest>, JsonRejection>,
) -> Result<Json<TopicVersion>, ApiError> {
    let id = parse_topic_id(&raw_id)?;
    let request = body(payload)?;
    require_text("name", &request.name)?;
    require_text("content", &request.content)?;

    let topic = state
        .graph
        .update(&id, request.name, request.content)
        .await
        .map_err(topic_error)?;

    tracing::info!(%role, topic_id = %topic.id, version = topic.version, "Topic updated");
    Ok(Json(topic))
}

/// Version history of a topic, newest first.
async fn list_versions_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    _role: CanRead,
    Path(raw_id): Path<String>,
) -> Result<Json<Vec<TopicVersion>>, ApiError> {
    let id = parse_topic_id(&raw_id)?;
    state.graph.list_versions(&id).await.map(Json).map_err(topic_error)
}

/// Tree snapshot rooted at a topic, tagged with its fingerprint.
async fn tree_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    _role: CanRead,
    Path(raw_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_topic_id(&raw_id)?;
    let start = Instant::now();
    let tree = state.graph.build_tree(&id).await.map_err(topic_error)?;
    record_tree_metrics(tree.node_count(), tree.depth(), start.elapsed().as_millis() as u64);

    let etag = format!("\"{}\"", tree.fingerprint());
    Ok(([(header::ETAG, etag)], Json(tree)))
}

/// Shortest path between two topics.
async fn path_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
    _role: CanRead,
    Query(query): Query<PathQuery>,
) -> Result<Json<PathResponse>, ApiError> {
    let (Some(raw_start), Some(raw_end)) = (query.start_topic_id, query.end_topic_id) else {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("INVALID_REQUEST", "Both startTopicId and endTopicId are required"),
        ));
    };
    let start_id = parse_topic_id(&raw_start)?;
    let end_id = parse_topic_id(&raw_end)?;

    let started = Instant::now();
    let path = state
        .graph
        .shortest_path(&start_id, &end_id)
        .await
        .map_err(topic_error)?;
    record_path_metrics(path.hop_count(), started.elapsed().as_millis() as u64);

    Ok(Json(PathResponse {
        hop_count: path.hop_count(),
        path,
    }))
}

/// Health check endpoint (detailed).
async fn health_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
) -> Json<HealthResponse> {
    let store_connected = state.store.is_healthy().await;

    Json(HealthResponse {
        status: if store_connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: TOPIC_GRAPH_SCHEMA_VERSION.to_string(),
        store_connected,
        pool: state.store.pool_stats(),
    })
}

/// Liveness probe endpoint.
///
/// Does NOT check dependencies.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 if the store is reachable, 503 otherwise.
async fn readiness_handler<S: TopicStore + 'static>(
    State(state): State<ServiceState<S>>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    if state.store.is_healthy().await {
        Ok(Json(ReadinessResponse {
            ready: true,
            store: true,
            details: None,
        }))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                ready: false,
                store: false,
                details: Some("Store connection failed".to_string()),
            }),
        ))
    }
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the topic graph service.
pub fn create_router<S: TopicStore + 'static>(state: ServiceState<S>) -> Router {
    Router::new()
        .route(
            "/api/topics",
            get(list_topics_handler::<S>).post(create_topic_handler::<S>),
        )
        .route("/api/topics/path", get(path_handler::<S>))
        .route(
            "/api/topics/:id",
            get(get_topic_handler::<S>).put(update_topic_handler::<S>),
        )
        .route("/api/topics/:id/versions", get(list_versions_handler::<S>))
        .route("/api/topics/:id/tree", get(tree_handler::<S>))
        .route("/health", get(health_handler::<S>))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler::<S>))
        .layer(middleware::from_fn(metrics_middleware))
        .with_state(state)
}
