//! Postgres pool construction and the embedded jobly schema.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

/// Pool handed to every repository call and stored in the API state.
pub type DbPool = PgPool;

/// Connect eagerly, failing fast if Postgres at `database_url` is unreachable.
///
/// `jobly serve` and `jobly migrate` pass their `--max-connections` here.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!(max_connections, "connecting to jobs database");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Build a pool that only opens connections when a query first needs one.
pub fn create_lazy_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_lazy(database_url)?;
    Ok(pool)
}

/// Apply the `companies` and `jobs` tables from the workspace `migrations/`
/// directory, compiled into the binary. Already-applied versions are skipped.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("applying jobly schema migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
