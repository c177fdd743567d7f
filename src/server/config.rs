/**
 * Server Configuration
 *
 * Loads the PostgreSQL connection from the environment and runs pending
 * migrations. Unlike ancillary services, the database is the system of
 * record here, so a missing or unreachable database fails startup instead
 * of degrading.
 */

use sqlx::PgPool;
use thiserror::Error;

/// Configuration errors that abort startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,

    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[source] sqlx::migrate::MigrateError),
}

/// Connect the database pool and run migrations
pub async fn load_database() -> Result<PgPool, ConfigError> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        tracing::error!("DATABASE_URL not set");
        ConfigError::MissingDatabaseUrl
    })?;

    tracing::info!("Connecting to database...");

    let pool = PgPool::connect(&database_url)
        .await
        .map_err(ConfigError::Connect)?;

    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(ConfigError::Migrate)?;
    tracing::info!("Database migrations completed successfully");

    Ok(pool)
}
