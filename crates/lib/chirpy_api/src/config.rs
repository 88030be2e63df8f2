//! API server configuration.

use std::path::PathBuf;
use std::time::Duration;

use chirpy_core::auth::jwt::resolve_jwt_secret;
use chirpy_core::db::DEFAULT_DATABASE_URL;

/// Default per-request deadline.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8080").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Deployment platform. Destructive admin actions require `dev`.
    pub platform: String,
    /// JWT signing secret.
    pub jwt_secret: String,
    /// API key the Polka payment provider presents on webhooks.
    pub polka_key: String,
    /// Directory served under `/app`.
    pub filepath_root: PathBuf,
    /// Deadline applied to every request.
    pub request_timeout: Duration,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                  | Default                             |
    /// |---------------------------|-------------------------------------|
    /// | `BIND_ADDR`               | `127.0.0.1:8080`                    |
    /// | `DATABASE_URL` / `DB_URL` | `postgres://localhost:5432/chirpy`  |
    /// | `PLATFORM`                | empty                               |
    /// | `JWT_SECRET` / `SECRET`   | generated & persisted to file       |
    /// | `POLKA_KEY`               | empty (webhooks rejected)           |
    /// | `FILEPATH_ROOT`           | `./public`                          |
    /// | `REQUEST_TIMEOUT_SECS`    | `10`                                |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into()),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("DB_URL"))
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            platform: std::env::var("PLATFORM").unwrap_or_default(),
            jwt_secret: resolve_jwt_secret(),
            polka_key: std::env::var("POLKA_KEY").unwrap_or_default(),
            filepath_root: std::env::var("FILEPATH_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./public")),
            request_timeout: Duration::from_secs(
                std::env::var("REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        }
    }

    /// Whether the server runs on the `dev` platform.
    pub fn is_dev(&self) -> bool {
        self.platform == "dev"
    }
}
