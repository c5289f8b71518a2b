//! Phone verification endpoints, backed by `PRC_COF_PHONE_REQUEST` and
//! `PRC_COF_PHONE_VERIFY`. Code generation, delivery, rate limiting and expiry all live
//! in the procedures; result codes pass through inside the 200 envelope.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::Envelope;
use crate::api::models::phone::{FindIdCodeRequest, PhoneCodeRequest, PhoneVerifyRequest, Purpose};
use crate::db::ProcedureCall;
use crate::errors::Error;

/// Send a verification code to a phone number
#[utoipa::path(
    post,
    path = "/phone/request",
    tag = "phone",
    request_body = PhoneCodeRequest,
    responses(
        (status = 200, description = "Dispatch result; inspect output.p_result_code (SUCCESS, INVALID_PHONE, TOO_MANY_REQUESTS, PHONE_DUPLICATE, ERROR)", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn request_code(State(state): State<AppState>, JsonBody(request): JsonBody<PhoneCodeRequest>) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_PHONE_REQUEST")
        .input("p_phone_number", request.phone_number)
        .input("p_purpose", request.purpose.as_str())
        .input("p_user_id", request.user_id)
        .output("p_verification_code")
        .output("p_result_code")
        .output("p_result_message");

    let result = state.gateway.invoke(call).await?;
    Ok(Json(Envelope::full(result)))
}

/// Send a verification code for account recovery (purpose pinned to FIND_ID)
#[utoipa::path(
    post,
    path = "/phone/request-find-id",
    tag = "phone",
    request_body = FindIdCodeRequest,
    responses(
        (status = 200, description = "Dispatch result; inspect output.p_result_code", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn request_find_id_code(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<FindIdCodeRequest>,
) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_PHONE_REQUEST")
        .input("p_phone_number", request.phone_number)
        .input("p_purpose", Purpose::FindId.as_str())
        .input("p_user_id", Option::<i64>::None)
        .output("p_verification_code")
        .output("p_result_code")
        .output("p_result_message");

    let result = state.gateway.invoke(call).await?;
    Ok(Json(Envelope::full(result)))
}

/// Check a verification code
#[utoipa::path(
    post,
    path = "/phone/verify",
    tag = "phone",
    request_body = PhoneVerifyRequest,
    responses(
        (status = 200, description = "Verification result; inspect output.p_result_code (SUCCESS, INVALID_CODE, EXPIRED_CODE, ERROR)", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn verify_code(State(state): State<AppState>, JsonBody(request): JsonBody<PhoneVerifyRequest>) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_PHONE_VERIFY")
        .input("p_phone_number", request.phone_number)
        .input("p_verification_code", request.verification_code)
        .input("p_purpose", request.purpose.as_str())
        .output("p_verification_id")
        .output("p_result_code")
        .output("p_result_message");

    let result = state.gateway.invoke(call).await?;
    Ok(Json(Envelope::full(result)))
}
