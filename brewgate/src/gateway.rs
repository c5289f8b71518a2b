//! The gateway contract: acquire a pooled connection, execute with a bounded timeout,
//! release on every exit path.
//!
//! Handlers never touch the pool directly; [`Gateway`] owns the per-request connection
//! lifecycle. The checked-out connection is an RAII guard, so check-in happens when it
//! drops, on every exit path including timeout. Acquisition and release are strictly
//! paired and a connection never spans two requests.

use std::time::Duration;

use crate::db::statement::{self, InsertResult};
use crate::db::{GatewayPool, JsonMap, ParamValue, ProcedureCall, ProcedureResult};
use crate::errors::Error;

#[derive(Clone)]
pub struct Gateway {
    pool: GatewayPool,
    statement_timeout: Duration,
    expose_detail: bool,
}

impl Gateway {
    pub fn new(pool: GatewayPool, statement_timeout: Duration, expose_detail: bool) -> Self {
        Self {
            pool,
            statement_timeout,
            expose_detail,
        }
    }

    /// Invoke a stored procedure and normalize its result.
    ///
    /// Suspends only this request while the call runs; concurrent requests proceed on
    /// their own pooled connections.
    #[tracing::instrument(skip_all, fields(procedure = call.name()))]
    pub async fn invoke(&self, call: ProcedureCall) -> Result<ProcedureResult, Error> {
        let mut conn = self.pool.acquire().await.map_err(|e| self.guard(e))?;

        match tokio::time::timeout(self.statement_timeout, call.execute(&mut conn)).await {
            Ok(result) => result.map_err(|e| self.guard(e)),
            // The guard drops here too; the pool recycles the interrupted connection
            Err(_) => Err(Error::Timeout {
                operation: format!("call {}", call.name()),
                timeout: self.statement_timeout,
            }),
        }
    }

    /// Plain-SQL variant: run a parameterized SELECT
    #[tracing::instrument(skip_all)]
    pub async fn query_rows(&self, sql: &str, params: Vec<ParamValue>) -> Result<Vec<JsonMap>, Error> {
        let mut conn = self.pool.acquire().await.map_err(|e| self.guard(e))?;

        match tokio::time::timeout(self.statement_timeout, statement::fetch_rows(&mut conn, sql, params)).await {
            Ok(result) => result.map_err(|e| self.guard(e)),
            Err(_) => Err(Error::Timeout {
                operation: format!("execute `{sql}`"),
                timeout: self.statement_timeout,
            }),
        }
    }

    /// Plain-SQL variant: run a parameterized INSERT and return the generated identifier
    #[tracing::instrument(skip_all)]
    pub async fn insert(&self, sql: &str, params: Vec<ParamValue>) -> Result<InsertResult, Error> {
        let mut conn = self.pool.acquire().await.map_err(|e| self.guard(e))?;

        match tokio::time::timeout(self.statement_timeout, statement::execute_insert(&mut conn, sql, params)).await {
            Ok(result) => result.map_err(|e| self.guard(e)),
            Err(_) => Err(Error::Timeout {
                operation: format!("execute `{sql}`"),
                timeout: self.statement_timeout,
            }),
        }
    }

    /// Drop driver error detail unless the environment allows exposing it
    fn guard(&self, err: Error) -> Error {
        if self.expose_detail { err } else { err.redacted() }
    }

    /// Close the underlying pool (graceful shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatabaseConfig, PoolSettings};

    fn unreachable_gateway(expose_detail: bool) -> Gateway {
        let config = DatabaseConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            user: "gateway".to_string(),
            password: String::new(),
            name: "mycoffee".to_string(),
            pool: PoolSettings {
                max_connections: 2,
                min_connections: 0,
                acquire_timeout_secs: 2,
                idle_timeout_secs: 0,
                max_lifetime_secs: 0,
            },
        };
        Gateway::new(GatewayPool::new(config), Duration::from_secs(2), expose_detail)
    }

    #[tokio::test]
    async fn test_invoke_surfaces_connectivity_error() {
        let gateway = unreachable_gateway(true);
        let call = ProcedureCall::new("PRC_COF_PHONE_REQUEST")
            .input("p_phone_number", "01012345678")
            .output("p_result_code");

        match gateway.invoke(call).await {
            Err(Error::Connectivity { detail }) => assert!(detail.is_some()),
            other => panic!("expected connectivity error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_production_gateway_redacts_detail() {
        let gateway = unreachable_gateway(false);
        let call = ProcedureCall::new("PRC_COF_PHONE_REQUEST").input("p_phone_number", "01012345678");

        match gateway.invoke(call).await {
            Err(Error::Connectivity { detail }) => assert!(detail.is_none()),
            other => panic!("expected connectivity error, got {other:?}"),
        }
    }
}
