use crate::config::DatabaseConfig;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError, PooledConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use std::env::VarError;
use tracing::info;

pub type ConnectionPool = Pool<ConnectionManager<PgConnection>>;
pub type Connection = PooledConnection<ConnectionManager<PgConnection>>;

pub type MigrationError = Box<dyn std::error::Error + Send + Sync>;

/// Builds the shared connection pool. Connections are checked for liveness before being handed out.
pub fn create_connection_pool(config: &DatabaseConfig, database_url: String) -> Result<ConnectionPool, PoolError> {
    let max_connections = match config.max_connections {
        0 => tokio::runtime::Handle::try_current()
            .map(|handle| handle.metrics().num_workers())
            .unwrap_or(1) as u32,
        n => n,
    };
    let manager = ConnectionManager::new(database_url);
    Pool::builder()
        .max_size(max_connections)
        .max_lifetime(None)
        .idle_timeout(None)
        .test_on_check_out(true)
        .build(manager)
}

/// Runs embedded migrations on the database, bringing the schema up to date on startup.
pub fn run_migrations(conn: &mut PgConnection) -> Result<(), MigrationError> {
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        info!("Applied migration {version}");
    }
    Ok(())
}

/// Returns a url for the database. `DATABASE_URL` is used verbatim if present. Otherwise the url is
/// assembled from `POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_HOST`, `POSTGRES_PORT` and `POSTGRES_DB`.
/// If `database_override` is not `None`, then its value will be used in place of `POSTGRES_DB`.
pub fn create_url(database_override: Option<&str>) -> Result<String, VarError> {
    // A missing .env file is fine, the variables may already be set
    let _ = dotenvy::dotenv();

    if database_override.is_none()
        && let Ok(url) = std::env::var("DATABASE_URL")
    {
        return Ok(url);
    }

    let user = std::env::var("POSTGRES_USER")?;
    let password = std::env::var("POSTGRES_PASSWORD")?;
    let database = match database_override {
        Some(database) => database.to_owned(),
        None => std::env::var("POSTGRES_DB")?,
    };
    let hostname = std::env::var("POSTGRES_HOST").unwrap_or_else(|_| String::from("localhost"));
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| String::from("5432"));

    Ok(format!("postgres://{user}:{password}@{hostname}:{port}/{database}"))
}

const MIGRATIONS: EmbeddedMigrations = embed_migrations!();
