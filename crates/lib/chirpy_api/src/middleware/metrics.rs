//! Visit counting for the static file server.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::metrics::Metrics;

/// Count the request, then serve it.
pub async fn count_hits(
    State(metrics): State<Arc<Metrics>>,
    request: Request,
    next: Next,
) -> Response {
    metrics.record_hit();
    next.run(request).await
}
