//! Plain parameterized SQL variant of the gateway contract.
//!
//! Identical lifecycle to the stored-procedure path, but with no named output
//! parameters: the result is exclusively row sequences and, for inserts, the
//! generated identifier.

use sqlx::mysql::MySqlConnection;

use super::procedure::{JsonMap, ParamValue, row_to_json};
use crate::errors::Error;

/// Outcome of an INSERT: the generated identifier plus the affected-row count
#[derive(Debug)]
pub struct InsertResult {
    pub last_insert_id: u64,
    pub rows_affected: u64,
}

/// Run a parameterized SELECT and normalize the rows
pub async fn fetch_rows(conn: &mut MySqlConnection, sql: &str, params: Vec<ParamValue>) -> Result<Vec<JsonMap>, Error> {
    let mut query = sqlx::query(sql);
    for value in &params {
        query = value.bind(query);
    }

    let rows = query.fetch_all(&mut *conn).await.map_err(|e| execution_error(sql, e))?;
    rows.iter().map(|row| row_to_json(row).map_err(|e| execution_error(sql, e))).collect()
}

/// Run a parameterized INSERT and return the generated identifier
pub async fn execute_insert(conn: &mut MySqlConnection, sql: &str, params: Vec<ParamValue>) -> Result<InsertResult, Error> {
    let mut query = sqlx::query(sql);
    for value in &params {
        query = value.bind(query);
    }

    let done = query.execute(&mut *conn).await.map_err(|e| execution_error(sql, e))?;
    Ok(InsertResult {
        last_insert_id: done.last_insert_id(),
        rows_affected: done.rows_affected(),
    })
}

fn execution_error(sql: &str, e: sqlx::Error) -> Error {
    Error::Execution {
        operation: format!("execute `{sql}`"),
        detail: Some(e.to_string()),
    }
}
