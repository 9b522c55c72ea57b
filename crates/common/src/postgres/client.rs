use anyhow::{Context, Result};
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime, Timeouts};
use tokio_postgres::NoTls;
use tracing::{debug, info};

use super::PostgresConfig;

/// PostgreSQL client wrapper with connection pooling
///
/// Cloning is cheap and every clone shares the same bounded pool.
#[derive(Clone)]
pub struct PostgresClient {
    pool: Pool,
}

impl PostgresClient {
    /// Creates a pooled client. No connection is opened until the first checkout
    /// (see [`PostgresClient::warm_up`]).
    pub fn new(config: &PostgresConfig) -> Result<Self> {
        config.validate()?;

        let mut cfg = Config::new();
        match &config.dsn {
            Some(dsn) => cfg.url = Some(dsn.clone()),
            None => {
                cfg.host = Some(config.host.clone());
                cfg.port = Some(config.port);
                cfg.dbname = Some(config.database.clone());
                cfg.user = Some(config.username.clone());
                cfg.password = Some(config.password.clone());
            }
        }
        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut timeouts = Timeouts::new();
        timeouts.wait = Some(config.acquire_timeout());
        timeouts.create = Some(config.acquire_timeout());
        timeouts.recycle = Some(config.acquire_timeout());
        let mut pool_config = PoolConfig::new(config.max_pool_size);
        pool_config.timeouts = timeouts;
        cfg.pool = Some(pool_config);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .context("Failed to create PostgreSQL pool")?;

        Ok(Self { pool })
    }

    /// Pings the database to verify connectivity
    pub async fn ping(&self) -> Result<()> {
        let client = self.get_connection().await?;
        client.execute("SELECT 1", &[]).await?;
        debug!("postgreSQL connection successful");
        Ok(())
    }

    /// Opens `count` connections at once and hands them back to the pool, so the
    /// pool starts with at least that many idle connections.
    pub async fn warm_up(&self, count: usize) -> Result<()> {
        let connections =
            futures::future::try_join_all((0..count).map(|_| self.pool.get()))
                .await
                .context("Failed to open initial PostgreSQL connections")?;
        drop(connections);

        let status = self.pool.status();
        info!(
            size = status.size,
            available = status.available,
            max_size = status.max_size,
            "PostgreSQL connection pool initialized"
        );
        Ok(())
    }

    /// Checks a connection out of the pool.
    /// The connection goes back to the pool when the returned guard is dropped.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Client> {
        self.pool
            .get()
            .await
            .context("Failed to acquire PostgreSQL connection from pool")
    }

    pub fn close(&self) {
        info!("Closing PostgreSQL connection pool");
        self.pool.close();
    }
}
