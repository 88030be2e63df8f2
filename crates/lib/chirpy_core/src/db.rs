//! PostgreSQL connection pool and embedded migrations.
//!
//! Migrations live in `chirpy_core/migrations/` and are compiled into the
//! binary.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

/// Default database URL when none is configured.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/chirpy";

/// How long a request may wait for a pooled connection.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

/// Open a connection pool against `url`.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    info!(max_connections, "connecting to PostgreSQL");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(url)
        .await
}

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("running database migrations");
    sqlx::migrate!("./migrations").run(pool).await
}
