//! Stored-procedure invocation: named, typed parameter bindings and result normalization.
//!
//! A [`ProcedureCall`] is built per request and discarded after execution. Inputs bind as
//! positional prepared-statement parameters (the names document the procedure signature
//! and appear in logs); outputs are MySQL user variables declared in the CALL statement
//! and read back with a follow-up `SELECT` on the same connection:
//!
//! ```sql
//! CALL PRC_COF_PHONE_VERIFY(?, ?, ?, @p_verification_id, @p_result_code, @p_result_message);
//! SELECT @p_verification_id AS p_verification_id, ...;
//! ```
//!
//! The result is normalized into a [`ProcedureResult`]: output values, result-row
//! sequences, and per-statement affected-row counts, all request-scoped.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures::StreamExt;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde_json::{Value, json};
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnection, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, Either, Row, TypeInfo, ValueRef};

use crate::errors::Error;

/// A JSON object row/output mapping
pub type JsonMap = serde_json::Map<String, Value>;

/// A typed input parameter value. Mirrors the value kinds the procedures declare:
/// strings, integers, booleans, dates, and NULL for absent optionals.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(NaiveDate),
    Null,
}

impl ParamValue {
    pub(crate) fn bind<'q>(&self, query: Query<'q, MySql, MySqlArguments>) -> Query<'q, MySql, MySqlArguments> {
        match self {
            ParamValue::Text(s) => query.bind(s.clone()),
            ParamValue::Int(i) => query.bind(*i),
            ParamValue::Bool(b) => query.bind(*b),
            ParamValue::Date(d) => query.bind(*d),
            ParamValue::Null => query.bind(Option::<String>::None),
        }
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Int(i)
    }
}

impl From<i32> for ParamValue {
    fn from(i: i32) -> Self {
        ParamValue::Int(i64::from(i))
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Bool(b)
    }
}

impl From<NaiveDate> for ParamValue {
    fn from(d: NaiveDate) -> Self {
        ParamValue::Date(d)
    }
}

/// Absent optional fields bind NULL
impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParamValue::Null, Into::into)
    }
}

/// The normalized union of a procedure's outputs: output parameter values, zero or more
/// result-row sequences, and per-statement affected-row counts. Lives for one
/// request/response cycle.
#[derive(Debug, Default)]
pub struct ProcedureResult {
    pub output: JsonMap,
    pub recordsets: Vec<Vec<JsonMap>>,
    pub rows_affected: Vec<u64>,
}

impl ProcedureResult {
    /// The first result set, or an empty sequence when the procedure returned none
    pub fn first_recordset(&self) -> Vec<JsonMap> {
        self.recordsets.first().cloned().unwrap_or_default()
    }
}

/// An ordered set of named, typed input bindings plus named output bindings, addressed
/// to one stored procedure.
#[derive(Debug)]
pub struct ProcedureCall {
    name: &'static str,
    inputs: Vec<(&'static str, ParamValue)>,
    outputs: Vec<&'static str>,
}

impl ProcedureCall {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn input(mut self, name: &'static str, value: impl Into<ParamValue>) -> Self {
        self.inputs.push((name, value.into()));
        self
    }

    pub fn output(mut self, name: &'static str) -> Self {
        self.outputs.push(name);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn call_sql(&self) -> String {
        let placeholders: Vec<String> = self
            .inputs
            .iter()
            .map(|_| "?".to_string())
            .chain(self.outputs.iter().map(|name| format!("@{name}")))
            .collect();
        format!("CALL {}({})", self.name, placeholders.join(", "))
    }

    fn select_outputs_sql(&self) -> String {
        let columns: Vec<String> = self.outputs.iter().map(|name| format!("@{name} AS {name}")).collect();
        format!("SELECT {}", columns.join(", "))
    }

    /// Execute the call on one connection and normalize the result.
    ///
    /// The output-variable SELECT must run on the same connection as the CALL; MySQL
    /// user variables are session-scoped.
    pub async fn execute(&self, conn: &mut MySqlConnection) -> Result<ProcedureResult, Error> {
        let sql = self.call_sql();
        let mut query = sqlx::query(&sql);
        for (_, value) in &self.inputs {
            query = value.bind(query);
        }

        let mut recordsets = Vec::new();
        let mut current = Vec::new();
        let mut rows_affected = Vec::new();

        {
            let mut stream = query.fetch_many(&mut *conn);
            while let Some(item) = stream.next().await {
                match item.map_err(|e| self.execution_error(e))? {
                    Either::Left(done) => {
                        rows_affected.push(done.rows_affected());
                        if !current.is_empty() {
                            recordsets.push(std::mem::take(&mut current));
                        }
                    }
                    Either::Right(row) => {
                        current.push(row_to_json(&row).map_err(|e| self.execution_error(e))?);
                    }
                }
            }
        }
        if !current.is_empty() {
            recordsets.push(current);
        }

        let output = if self.outputs.is_empty() {
            JsonMap::new()
        } else {
            let row = sqlx::query(&self.select_outputs_sql())
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| self.execution_error(e))?;
            row_to_json(&row).map_err(|e| self.execution_error(e))?
        };

        Ok(ProcedureResult {
            output,
            recordsets,
            rows_affected,
        })
    }

    fn execution_error(&self, e: sqlx::Error) -> Error {
        Error::Execution {
            operation: format!("call {}", self.name),
            detail: Some(e.to_string()),
        }
    }
}

/// Convert a result row into a JSON mapping from column name to value.
///
/// Column types follow the MySQL type name; output variables frequently surface as
/// LONGBLOB/VARCHAR regardless of the declared OUT type, so the fallback decodes text.
pub(crate) fn row_to_json(row: &MySqlRow) -> Result<JsonMap, sqlx::Error> {
    let mut map = JsonMap::new();
    for (i, column) in row.columns().iter().enumerate() {
        let value = if row.try_get_raw(i)?.is_null() {
            Value::Null
        } else {
            match column.type_info().name() {
                "BOOLEAN" => json!(row.try_get::<bool, _>(i)?),
                "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => json!(row.try_get::<i64, _>(i)?),
                name if name.ends_with("UNSIGNED") => json!(row.try_get::<u64, _>(i)?),
                "BIT" => json!(row.try_get::<u64, _>(i)?),
                "FLOAT" => json!(row.try_get::<f32, _>(i)?),
                "DOUBLE" => json!(row.try_get::<f64, _>(i)?),
                "DECIMAL" => {
                    let decimal = row.try_get::<Decimal, _>(i)?;
                    match decimal.to_f64() {
                        Some(f) => json!(f),
                        None => Value::String(decimal.to_string()),
                    }
                }
                "DATE" => Value::String(row.try_get::<NaiveDate, _>(i)?.to_string()),
                "TIME" => Value::String(row.try_get::<NaiveTime, _>(i)?.to_string()),
                "DATETIME" => Value::String(row.try_get::<NaiveDateTime, _>(i)?.to_string()),
                "TIMESTAMP" => Value::String(row.try_get::<DateTime<Utc>, _>(i)?.to_rfc3339()),
                "JSON" => row.try_get::<Value, _>(i)?,
                _ => Value::String(row.try_get::<String, _>(i)?),
            }
        };
        map.insert(column.name().to_string(), value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_sql_mixes_placeholders_and_output_variables() {
        let call = ProcedureCall::new("PRC_COF_PHONE_REQUEST")
            .input("p_phone_number", "01012345678")
            .input("p_purpose", "SIGNUP")
            .input("p_user_id", Option::<i64>::None)
            .output("p_verification_code")
            .output("p_result_code")
            .output("p_result_message");

        assert_eq!(
            call.call_sql(),
            "CALL PRC_COF_PHONE_REQUEST(?, ?, ?, @p_verification_code, @p_result_code, @p_result_message)"
        );
        assert_eq!(
            call.select_outputs_sql(),
            "SELECT @p_verification_code AS p_verification_code, @p_result_code AS p_result_code, \
             @p_result_message AS p_result_message"
        );
    }

    #[test]
    fn test_call_sql_without_outputs() {
        let call = ProcedureCall::new("PRC_COF_RECOMMEND")
            .input("p_aroma", 3)
            .input("p_acidity", 4)
            .input("p_nutty", 2)
            .input("p_body", 5)
            .input("p_sweetness", 1)
            .input("p_user_id", Option::<i64>::None);

        assert_eq!(call.call_sql(), "CALL PRC_COF_RECOMMEND(?, ?, ?, ?, ?, ?)");
        assert!(call.outputs.is_empty());
    }

    #[test]
    fn test_absent_optionals_bind_null() {
        assert_eq!(ParamValue::from(Option::<String>::None), ParamValue::Null);
        assert_eq!(ParamValue::from(Some("WEB")), ParamValue::Text("WEB".into()));
        assert_eq!(ParamValue::from(Some(1990)), ParamValue::Int(1990));
    }

    #[test]
    fn test_first_recordset_defaults_to_empty() {
        let result = ProcedureResult::default();
        assert!(result.first_recordset().is_empty());

        let mut row = JsonMap::new();
        row.insert("blend_name".into(), json!("Dark Forest"));
        let result = ProcedureResult {
            output: JsonMap::new(),
            recordsets: vec![vec![row.clone()], vec![]],
            rows_affected: vec![1, 0],
        };
        assert_eq!(result.first_recordset(), vec![row]);
    }
}
