//! Service middleware for metrics and request tracking.
//!
//! ## Metrics Exposed
//!
//! - `request_metric` - One event per request with path pattern, method, status, latency
//! - `tree_metric` - Node count and latency of each tree snapshot
//! - `path_metric` - Hop count and latency of each path search

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use regex_lite::Regex;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

/// Metrics middleware that records request counts and latency.
///
/// Emitted as structured tracing events so they can be aggregated from logs.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = normalize_path(request.uri().path());

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status().as_u16();

    info!(
        target: "topic_graph::metrics",
        metric_type = "request",
        path = %path,
        method = %method,
        status = status,
        latency_ms = latency.as_millis() as u64,
        "request_metric"
    );

    response
}

fn uuid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("uuid pattern is a valid regex")
    })
}

/// Normalize path for metrics to avoid high cardinality.
///
/// Topic ids in the path become `:id`.
pub fn normalize_path(path: &str) -> String {
    uuid_pattern().replace_all(path, ":id").to_string()
}

/// Record tree snapshot metrics.
pub fn record_tree_metrics(node_count: usize, depth: usize, latency_ms: u64) {
    info!(
        target: "topic_graph::metrics",
        metric_type = "tree",
        node_count = node_count,
        depth = depth,
        latency_ms = latency_ms,
        "tree_metric"
    );
}

/// Record path search metrics.
pub fn record_path_metrics(hop_count: usize, latency_ms: u64) {
    info!(
        target: "topic_graph::metrics",
        metric_type = "path",
        hop_count = hop_count,
        latency_ms = latency_ms,
        "path_metric"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_replaces_uuid() {
        let path = "/api/topics/550e8400-e29b-41d4-a716-446655440000/tree";
        let normalized = normalize_path(path);
        assert_eq!(normalized, "/api/topics/:id/tree");
    }

    #[test]
    fn test_normalize_path_preserves_regular_path() {
        let path = "/health/ready";
        let normalized = normalize_path(path);
        assert_eq!(normalized, "/health/ready");
    }

    #[test]
    fn test_normalize_path_uppercase_uuid() {
        let path = "/api/topics/550E8400-E29B-41D4-A716-446655440000/versions";
        assert_eq!(normalize_path(path), "/api/topics/:id/versions");
    }
}
