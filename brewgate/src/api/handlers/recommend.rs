//! Blend recommendation endpoint, backed by `PRC_COF_RECOMMEND`. The procedure computes
//! the taste-distance ranking; the response is the bare row sequence.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::recommend::RecommendRequest;
use crate::db::{JsonMap, ProcedureCall};
use crate::errors::Error;

/// Recommend coffee blends for a taste profile
#[utoipa::path(
    post,
    path = "/api/recommend",
    tag = "recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Blends ranked by taste distance", body = Vec<Object>),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn recommend(State(state): State<AppState>, JsonBody(request): JsonBody<RecommendRequest>) -> Result<Json<Vec<JsonMap>>, Error> {
    let call = ProcedureCall::new("PRC_COF_RECOMMEND")
        .input("p_aroma", request.aroma)
        .input("p_acidity", request.acidity)
        .input("p_nutty", request.nutty)
        .input("p_body", request.body)
        .input("p_sweetness", request.sweetness)
        .input("p_user_id", request.user_id);

    let result = state.gateway.invoke(call).await?;
    Ok(Json(result.first_recordset()))
}
