//! # chirpy_api
//!
//! HTTP API library for Chirpy.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use chirpy_core::auth::queries::{PgRefreshTokenStore, PgUserStore};
use chirpy_core::auth::refresh::RefreshTokenService;
use chirpy_core::auth::store::UserStore;
use chirpy_core::chirps::ChirpStore;
use chirpy_core::chirps::queries::PgChirpStore;
use chirpy_core::memory::MemoryStore;
use sqlx::PgPool;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{admin, auth, chirps, health, users, webhooks};
use crate::metrics::Metrics;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub chirps: Arc<dyn ChirpStore>,
    pub refresh_tokens: RefreshTokenService,
    /// API configuration.
    pub config: ApiConfig,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: PgPool, config: ApiConfig) -> Self {
        let refresh_tokens = RefreshTokenService::new(
            Arc::new(PgRefreshTokenStore::new(pool.clone())),
            config.jwt_secret.as_bytes(),
        );
        Self {
            users: Arc::new(PgUserStore::new(pool.clone())),
            chirps: Arc::new(PgChirpStore::new(pool)),
            refresh_tokens,
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// State backed by a single process-local [`MemoryStore`].
    pub fn in_memory(config: ApiConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            users: store.clone(),
            chirps: store.clone(),
            refresh_tokens: RefreshTokenService::new(store, config.jwt_secret.as_bytes()),
            config,
            metrics: Arc::new(Metrics::new()),
        }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/healthz", get(health::readiness_handler))
        .route("/api/users", post(users::create_user_handler))
        .route("/api/login", post(auth::login_handler))
        .route("/api/refresh", post(auth::refresh_handler))
        .route("/api/revoke", post(auth::revoke_handler))
        .route("/api/chirps", get(chirps::list_chirps_handler))
        .route("/api/chirps/{id}", get(chirps::get_chirp_handler))
        .route("/api/polka/webhooks", post(webhooks::polka_webhook_handler))
        .route("/admin/metrics", get(admin::metrics_handler))
        .route("/admin/reset", post(admin::reset_handler));

    // Protected routes (require an access token)
    let protected = Router::new()
        .route("/api/users", put(users::update_credentials_handler))
        .route("/api/chirps", post(chirps::create_chirp_handler))
        .route("/api/chirps/{id}", delete(chirps::delete_chirp_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Static files, counted by the metrics middleware
    let files = Router::new()
        .nest_service("/app", ServeDir::new(&state.config.filepath_root))
        .layer(axum::middleware::from_fn_with_state(
            state.metrics.clone(),
            middleware::metrics::count_hits,
        ));

    let timeout = state.config.request_timeout;

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(files)
        .layer(TimeoutLayer::new(timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
