use crate::api;
use crate::config::{Config, ConfigError};
use crate::db::{self, Connection, ConnectionPool, MigrationError};
use crate::error::ErrorKind;
use axum::ServiceExt;
use axum::extract::Request;
use diesel::r2d2::PoolError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::unix::SignalKind;
use tower::layer::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Shared state handed to every request handler.
#[derive(Clone)]
pub struct AppState {
    pub connection_pool: ConnectionPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(connection_pool: ConnectionPool, config: Config) -> Self {
        Self {
            connection_pool,
            config: Arc::new(config),
        }
    }

    /// Returns a connection to the database from the connection pool.
    pub fn get_connection(&self) -> Result<Connection, PoolError> {
        self.connection_pool.get()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InitializationError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Missing database environment variable. Details:\n{0}")]
    DatabaseUrl(#[from] std::env::VarError),
    #[error("Could not build connection pool. Details:\n{0}")]
    Pool(#[from] PoolError),
    #[error("Could not run migrations. Details:\n{0}")]
    Migration(MigrationError),
}

impl ErrorKind for InitializationError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "InvalidConfig",
            Self::DatabaseUrl(err) => err.kind(),
            Self::Pool(_) => "FailedConnection",
            Self::Migration(_) => "FailedMigration",
        }
    }
}

/// Installs the global tracing subscriber. `RUST_LOG` takes precedence over the configured `log_filter`.
pub fn enable_tracing(config: &Config) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connects to the database and brings its schema up to date.
pub fn initialize(config: Config) -> Result<AppState, InitializationError> {
    let database_url = db::create_url(None)?;
    let connection_pool = db::create_connection_pool(&config.database, database_url)?;
    let mut conn = connection_pool.get()?;
    db::run_migrations(&mut conn).map_err(InitializationError::Migration)?;
    Ok(AppState::new(connection_pool, config))
}

pub async fn run(state: AppState) -> std::io::Result<()> {
    let address = format!("0.0.0.0:{}", state.config.port);
    let app = NormalizePathLayer::trim_trailing_slash().layer(api::routes(state));

    let listener = TcpListener::bind(address).await?;
    info!("Forum server running on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("Failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("Stopping server...");
}
