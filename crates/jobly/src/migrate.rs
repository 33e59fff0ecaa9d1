//! SQL migrations via [`refinery`].
//!
//! The jobly schema ships embedded in the library, so applying it needs no
//! files on disk at runtime.
//!
//! # Example
//!
//! ```ignore
//! let pool = jobly::create_pool(&config.database_url, config.pool_max_size)?;
//! let report = jobly::migrate::run_pool(&pool).await?;
//! ```

use crate::error::JoblyResult;

pub use refinery::Report;

mod embedded {
    refinery::embed_migrations!("migrations");
}

/// The full schema DDL, identical to the first migration.
///
/// Useful for building throwaway schemas (for example one per test) without
/// going through the migration history table.
pub const SCHEMA_SQL: &str = include_str!("../migrations/V1__jobly_schema.sql");

/// Build a runner over the embedded migrations.
pub fn runner() -> refinery::Runner {
    embedded::migrations::runner()
}

/// Run the embedded migrations on a single PostgreSQL connection.
pub async fn run(client: &mut tokio_postgres::Client) -> JoblyResult<Report> {
    let report = runner().run_async(client).await?;
    for migration in report.applied_migrations() {
        tracing::info!(target: "jobly.migrate", migration = %migration, "applied migration");
    }
    Ok(report)
}

/// Acquire a connection from a pool and run migrations on it.
#[cfg(feature = "pool")]
pub async fn run_pool(pool: &deadpool_postgres::Pool) -> JoblyResult<Report> {
    let mut client = pool.get().await?;
    run(&mut client).await
}
