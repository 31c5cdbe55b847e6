//! HTTP hand history server.
//!
//! Stores finished six-max hands in PostgreSQL (or memory) and serves them
//! back over a small JSON API.

use std::sync::Arc;

use anyhow::{Context, Error};
use pico_args::Arguments;
use sixmax::{Database, HandRepository, InMemoryHandRepository, PgHandRepository};
use sm_server::{
    api::{self, AppState},
    config::{HandStoreKind, Overrides, ServerConfig},
    logging, metrics,
};
use tracing::{error, info, warn};

const HELP: &str = "\
Run the six-max hand history server

USAGE:
  sm_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND, or API_HOST:API_PORT, or 0.0.0.0:8000]
  --db-url     URL         Database connection string  [default: env DATABASE_URL, or assembled from DB_* / POSTGRES_*]
  --store      KIND        Hand store, postgres or memory  [default: env HAND_STORE or postgres]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8000)
  API_HOST / API_PORT      Bind host and port when SERVER_BIND is unset
  DATABASE_URL             PostgreSQL connection string
  DB_HOST / DB_PORT        Database host and port
  POSTGRES_USER / POSTGRES_PASSWORD / POSTGRES_DB
  FRONTEND_URL             Origin allowed by CORS  [default: http://localhost:3000]
  METRICS_BIND             Prometheus exporter address (disabled when unset)
  RUST_LOG                 Log filter
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let overrides = Overrides {
        bind: pargs.opt_value_from_str("--bind")?,
        database_url: pargs.opt_value_from_str("--db-url")?,
        hand_store: pargs.opt_value_from_str("--store")?,
    };

    logging::init();

    let config = ServerConfig::from_env(overrides).context("Invalid configuration")?;
    config.validate().context("Invalid configuration")?;

    if let Some(addr) = config.metrics_bind {
        match metrics::init_metrics(addr) {
            Ok(()) => info!("Prometheus metrics exposed at http://{addr}/metrics"),
            Err(e) => warn!("{e}"),
        }
    }

    let (repository, database): (Arc<dyn HandRepository>, Option<Database>) =
        match config.hand_store {
            HandStoreKind::Postgres => {
                info!("Connecting to database");
                let db = Database::new(&config.database)
                    .await
                    .context("Failed to connect to database")?;
                let repository = PgHandRepository::new(db.pool().clone());
                repository
                    .init_schema()
                    .await
                    .context("Failed to create the hands table")?;
                info!("Database connected successfully");
                let repository: Arc<dyn HandRepository> = Arc::new(repository);
                (repository, Some(db))
            }
            HandStoreKind::Memory => {
                warn!("Using the in-memory hand store, hands are lost on restart");
                let repository: Arc<dyn HandRepository> = Arc::new(InMemoryHandRepository::new());
                (repository, None)
            }
        };

    let state = AppState {
        repository,
        database: database.clone(),
    };
    let app = api::create_router(state, &config.allowed_origins());

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind))?;

    info!(
        "Server is running at http://{} ({} store). Press Ctrl+C to stop.",
        config.bind, config.hand_store
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutting down server...");
    if let Some(db) = database {
        db.close().await;
    }

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}
