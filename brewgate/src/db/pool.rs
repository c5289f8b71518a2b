//! Lazily-initialized, process-wide MySQL connection pool.
//!
//! The pool has exactly two states: **uninitialized** (no connection attempted yet) and
//! **ready** (pool established). A failed initialization leaves the state uninitialized,
//! so the next request attempts a fresh connection instead of reusing a failed handle.
//!
//! [`GatewayPool`] is cheap to clone and is the single shared resource across concurrent
//! requests; the underlying sqlx pool manages checkout/check-in and connection limits.

use sqlx::MySqlPool;
use sqlx::mysql::{MySql, MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::config::DatabaseConfig;
use crate::errors::Error;

#[derive(Clone)]
pub struct GatewayPool {
    config: DatabaseConfig,
    inner: Arc<RwLock<Option<MySqlPool>>>,
}

impl GatewayPool {
    /// Create the handle without connecting; the pool is established on first acquire
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            inner: Arc::new(RwLock::new(None)),
        }
    }

    /// Check out a connection, establishing the pool on first use.
    ///
    /// Checkout failures on an established pool surface as [`Error::Connectivity`] but do
    /// not reset the pool; only initialization failures leave it uninitialized for retry.
    pub async fn acquire(&self) -> Result<PoolConnection<MySql>, Error> {
        let pool = {
            let ready = self.inner.read().await.clone();
            match ready {
                Some(pool) => pool,
                None => {
                    let mut guard = self.inner.write().await;
                    // Another request may have connected while we waited for the lock
                    match guard.as_ref() {
                        Some(pool) => pool.clone(),
                        None => {
                            let pool = self.connect().await?;
                            *guard = Some(pool.clone());
                            tracing::info!(
                                host = %self.config.host,
                                database = %self.config.name,
                                "Database pool established"
                            );
                            pool
                        }
                    }
                }
            }
        };

        pool.acquire().await.map_err(|e| Error::Connectivity {
            detail: Some(e.to_string()),
        })
    }

    async fn connect(&self) -> Result<MySqlPool, Error> {
        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(&self.config.name);

        let settings = &self.config.pool;
        let idle_timeout = (settings.idle_timeout_secs > 0).then(|| Duration::from_secs(settings.idle_timeout_secs));
        let max_lifetime = (settings.max_lifetime_secs > 0).then(|| Duration::from_secs(settings.max_lifetime_secs));

        MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(settings.min_connections)
            .acquire_timeout(Duration::from_secs(settings.acquire_timeout_secs))
            .idle_timeout(idle_timeout)
            .max_lifetime(max_lifetime)
            .connect_with(options)
            .await
            .map_err(|e| Error::Connectivity {
                detail: Some(e.to_string()),
            })
    }

    /// Whether the pool has been established
    pub async fn is_ready(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Close the pool, waiting for checked-out connections to be returned
    pub async fn close(&self) {
        let pool = self.inner.read().await.clone();
        if let Some(pool) = pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PoolSettings;

    fn unreachable_config() -> DatabaseConfig {
        DatabaseConfig {
            host: "127.0.0.1".to_string(),
            // Reserved port, nothing listens here; connect is refused immediately
            port: 1,
            user: "gateway".to_string(),
            password: "irrelevant".to_string(),
            name: "mycoffee".to_string(),
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 0,
                acquire_timeout_secs: 2,
                idle_timeout_secs: 0,
                max_lifetime_secs: 0,
            },
        }
    }

    #[tokio::test]
    async fn test_failed_initialization_leaves_pool_uninitialized() {
        let pool = GatewayPool::new(unreachable_config());
        assert!(!pool.is_ready().await);

        let first = pool.acquire().await;
        assert!(matches!(first, Err(Error::Connectivity { .. })));

        // The failure must not poison the handle: state returns to uninitialized
        // and the next acquire attempts a fresh connection.
        assert!(!pool.is_ready().await);

        let second = pool.acquire().await;
        assert!(matches!(second, Err(Error::Connectivity { .. })));
        assert!(!pool.is_ready().await);
    }

    #[tokio::test]
    async fn test_connectivity_error_carries_detail() {
        let pool = GatewayPool::new(unreachable_config());
        match pool.acquire().await {
            Err(Error::Connectivity { detail }) => assert!(detail.is_some()),
            other => panic!("expected connectivity error, got {other:?}"),
        }
    }
}
