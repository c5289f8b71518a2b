//! The normalized response envelope.
//!
//! Each endpoint commits to one stable shape so clients can rely on field presence:
//! the full envelope (`output` + `recordset` + `rowsAffected`) for the verification and
//! signup flows, output-only for login and password reset, and a bare row array for
//! recommendation results. Sections that do not apply to an endpoint are omitted
//! entirely rather than serialized as null.

use serde::Serialize;
use utoipa::ToSchema;

use crate::db::{JsonMap, ProcedureResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct Envelope {
    /// Output parameter values populated by the stored procedure
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub output: Option<JsonMap>,
    /// Rows of the first result set (empty array when the procedure returned none)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Vec<Object>)]
    pub recordset: Option<Vec<JsonMap>>,
    /// Per-statement affected-row counts
    #[serde(rename = "rowsAffected", skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<Vec<u64>>,
}

impl Envelope {
    /// Full envelope: output values, result rows and affected-row counts
    pub fn full(result: ProcedureResult) -> Self {
        Self {
            recordset: Some(result.first_recordset()),
            rows_affected: Some(result.rows_affected),
            output: Some(result.output),
        }
    }

    /// Output-only envelope for endpoints whose procedures return no rows
    pub fn output_only(result: ProcedureResult) -> Self {
        Self {
            output: Some(result.output),
            recordset: None,
            rows_affected: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn sample_result() -> ProcedureResult {
        let mut output = JsonMap::new();
        output.insert("p_result_code".into(), json!("SUCCESS"));
        output.insert("p_result_message".into(), json!("ok"));
        ProcedureResult {
            output,
            recordsets: vec![],
            rows_affected: vec![1],
        }
    }

    #[test]
    fn test_full_envelope_shape() {
        let value = serde_json::to_value(Envelope::full(sample_result())).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj["output"]["p_result_code"], json!("SUCCESS"));
        // recordset is present even when empty so clients can rely on the field
        assert_eq!(obj["recordset"], json!([]));
        assert_eq!(obj["rowsAffected"], json!([1]));
    }

    #[test]
    fn test_output_only_envelope_omits_inapplicable_sections() {
        let value = serde_json::to_value(Envelope::output_only(sample_result())).unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("output"));
        assert!(!obj.contains_key("recordset"));
        assert!(!obj.contains_key("rowsAffected"));
    }

    #[test]
    fn test_full_envelope_carries_first_recordset() {
        let mut row = JsonMap::new();
        row.insert("blend_name".into(), Value::String("Morning Haze".into()));
        let result = ProcedureResult {
            output: JsonMap::new(),
            recordsets: vec![vec![row]],
            rows_affected: vec![1, 0],
        };

        let value = serde_json::to_value(Envelope::full(result)).unwrap();
        assert_eq!(value["recordset"][0]["blend_name"], json!("Morning Haze"));
        assert_eq!(value["rowsAffected"], json!([1, 0]));
    }
}
