//! Connection utilities

use crate::error::{JoblyError, JoblyResult};
use tokio_postgres::NoTls;

/// Open a single connection and drive it on a background task.
///
/// # Example
///
/// ```ignore
/// let client = jobly::connect("postgresql:///jobly").await?;
/// let companies = jobly::models::company::find_all(&client, None).await?;
/// ```
pub async fn connect(database_url: &str) -> JoblyResult<tokio_postgres::Client> {
    let (client, connection) = tokio_postgres::connect(database_url, NoTls)
        .await
        .map_err(|e| JoblyError::Connection(e.to_string()))?;

    tokio::spawn(async move {
        if let Err(err) = connection.await {
            tracing::error!(target: "jobly.sql", error = %err, "connection error");
        }
    });

    Ok(client)
}

#[cfg(feature = "pool")]
pub use self::pooled::{create_pool, create_pool_with_config};

#[cfg(feature = "pool")]
mod pooled {
    use crate::config::JoblyConfig;
    use crate::error::{JoblyError, JoblyResult};
    use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
    use tokio_postgres::NoTls;

    /// Create a connection pool from a database URL.
    ///
    /// Uses `NoTls` and fast recycling.
    pub fn create_pool(database_url: &str, max_size: usize) -> JoblyResult<Pool> {
        let pg_config: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| JoblyError::Connection(e.to_string()))?;

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };
        let mgr = Manager::from_config(pg_config, NoTls, manager_config);
        Pool::builder(mgr)
            .max_size(max_size)
            .build()
            .map_err(|e| JoblyError::Pool(e.to_string()))
    }

    /// Create a connection pool sized by `config`.
    pub fn create_pool_with_config(config: &JoblyConfig) -> JoblyResult<Pool> {
        create_pool(&config.database_url, config.pool_max_size)
    }
}
