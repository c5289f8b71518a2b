//! Request model for the blend recommendation endpoint.
//!
//! The five taste scores are forwarded verbatim; the distance computation against the
//! blend catalogue happens inside `PRC_COF_RECOMMEND`.

use serde::Deserialize;
use utoipa::ToSchema;

/// `POST /api/recommend` body: taste preference scores
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecommendRequest {
    #[schema(example = 3)]
    pub aroma: i32,
    #[schema(example = 4)]
    pub acidity: i32,
    #[schema(example = 2)]
    pub nutty: i32,
    #[schema(example = 5)]
    pub body: i32,
    #[schema(example = 1)]
    pub sweetness: i32,
    /// Attribute the recommendation to a user, when known
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_defaults_to_null() {
        let request: RecommendRequest =
            serde_json::from_str(r#"{"aroma": 3, "acidity": 4, "nutty": 2, "body": 5, "sweetness": 1}"#).unwrap();
        assert!(request.user_id.is_none());
    }

    #[test]
    fn test_missing_score_is_rejected() {
        assert!(serde_json::from_str::<RecommendRequest>(r#"{"aroma": 3, "acidity": 4}"#).is_err());
    }

    #[test]
    fn test_non_integer_score_is_rejected() {
        assert!(
            serde_json::from_str::<RecommendRequest>(r#"{"aroma": "high", "acidity": 4, "nutty": 2, "body": 5, "sweetness": 1}"#)
                .is_err()
        );
    }
}
