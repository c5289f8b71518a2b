//! Signup endpoint, backed by `PRC_COF_USER_SIGNUP`. Duplicate checks, password policy
//! and hashing, and the terms bookkeeping are all procedure-side.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::Envelope;
use crate::api::models::signup::SignupRequest;
use crate::db::ProcedureCall;
use crate::errors::Error;

/// Create a new account
#[utoipa::path(
    post,
    path = "/signup",
    tag = "account",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Signup result; on SUCCESS output.p_user_id and output.p_session_id are set", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn signup(State(state): State<AppState>, JsonBody(request): JsonBody<SignupRequest>) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_USER_SIGNUP")
        .input("p_validation_mode", request.validation_mode.as_str())
        .input("p_email", request.email)
        .input("p_password", request.password)
        .input("p_name", request.name)
        .input("p_birth_year", request.birth_year)
        .input("p_birth_date", request.birth_date)
        .input("p_gender", request.gender.map(|g| g.as_str()))
        .input("p_phone_number", request.phone_number)
        .input("p_verification_code", request.verification_code)
        .input("p_terms_agreed", request.terms_agreed)
        .input("p_privacy_agreed", request.privacy_agreed)
        .input("p_marketing_agreed", request.marketing_agreed)
        .input("p_ip_address", request.ip_address)
        .input("p_user_agent", request.user_agent)
        .input("p_device_type", request.device_type.map(|d| d.as_str()))
        .input("p_device_id", request.device_id)
        .input("p_app_version", request.app_version)
        .output("p_user_id")
        .output("p_session_id")
        .output("p_result_code")
        .output("p_result_message");

    let result = state.gateway.invoke(call).await?;
    Ok(Json(Envelope::full(result)))
}
