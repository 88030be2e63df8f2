//! Chirpy API server binary.

use chirpy_api::config::ApiConfig;
use chirpy_api::{AppState, router};
use chirpy_core::db;
use clap::Parser;
use tracing::{info, warn};

/// CLI arguments for the API server. Flags override the environment.
#[derive(Parser, Debug)]
#[command(name = "chirpy_server", about = "Chirpy API server", version)]
struct Args {
    /// Address to listen on. Defaults to `BIND_ADDR` or 127.0.0.1:8080.
    #[arg(long)]
    bind_addr: Option<String>,

    /// PostgreSQL connection URL. Defaults to `DATABASE_URL` or `DB_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, env = "MAX_CONNECTIONS", default_value_t = 5)]
    max_connections: u32,

    /// Keep all data in process memory instead of PostgreSQL.
    #[arg(long, default_value_t = false)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info,chirpy_api=debug,chirpy_core=debug")
                }),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(addr) = args.bind_addr {
        config.bind_addr = addr;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    if config.polka_key.is_empty() {
        warn!("POLKA_KEY is not set; payment webhooks will be rejected");
    }

    info!(
        version = chirpy_core::version(),
        platform = %config.platform,
        in_memory = args.in_memory,
        "starting chirpy_server"
    );

    let state = if args.in_memory {
        AppState::in_memory(config.clone())
    } else {
        let pool = db::connect(&config.database_url, args.max_connections).await?;
        db::migrate(&pool).await?;
        AppState::postgres(pool, config.clone())
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, root = %config.filepath_root.display(), "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
