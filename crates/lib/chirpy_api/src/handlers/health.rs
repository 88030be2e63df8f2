//! Readiness probe.

/// `GET /api/healthz`
pub async fn readiness_handler() -> &'static str {
    "OK"
}
