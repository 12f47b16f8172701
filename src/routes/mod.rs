// HTTP routes: Prometheus scrape endpoint plus JSON views

mod http;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::metrics::MetricsRegistry;
use crate::store::SnapshotStore;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) metrics: Arc<MetricsRegistry>,
    pub(crate) store: Arc<SnapshotStore>,
}

pub fn app(metrics: Arc<MetricsRegistry>, store: Arc<SnapshotStore>) -> Router {
    let state = AppState { metrics, store };
    Router::new()
        .route("/", get(|| async { "OpenPBS exporter. Metrics at /metrics" })) // GET /
        .route("/metrics", get(http::metrics_handler)) // GET /metrics
        .route("/api/snapshot", get(http::snapshot_handler)) // GET /api/snapshot
        .route("/version", get(http::version_handler)) // GET /version
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
