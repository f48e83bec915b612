//! Topic Graph REST Service
//!
//! Exposes topic operations as a REST API.
//!
//! ## Endpoints
//!
//! - `POST /api/topics` - Create a topic (write)
//! - `GET /api/topics` - List every version record
//! - `GET /api/topics/path?startTopicId=..&endTopicId=..` - Shortest path between topics
//! - `GET /api/topics/:id` - Fetch one version record
//! - `PUT /api/topics/:id` - Append a new version (write)
//! - `GET /api/topics/:id/versions` - Version history, newest first
//! - `GET /api/topics/:id/tree` - Tree snapshot, with `ETag`
//! - `GET /health` - Detailed service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//!
//! Every `/api` route requires an `X-User-Role` header.

pub mod access;
pub mod config;
pub mod middleware;
pub mod routes;
pub mod state;

pub use access::{Capability, CanRead, CanWrite, Role, UnknownRole, ROLE_HEADER};
pub use config::{LogFormat, ServiceConfig};
pub use middleware::{metrics_middleware, record_path_metrics, record_tree_metrics};
pub use routes::{create_router, ApiError, ErrorResponse};
pub use state::ServiceState;
