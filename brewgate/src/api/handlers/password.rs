//! Password reset endpoint, backed by `PRC_COF_PASSWORD_RESET`. Verification-code and
//! password-match checks are procedure-side; the envelope is output-only.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::Envelope;
use crate::api::models::password::ResetPasswordRequest;
use crate::db::ProcedureCall;
use crate::errors::Error;

/// Reset a password using a phone verification code
#[utoipa::path(
    post,
    path = "/api/reset-password",
    tag = "account",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Reset result; inspect output.p_result_code", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_PASSWORD_RESET")
        .input("p_email", request.email)
        .input("p_phone_number", request.phone_number)
        .input("p_verification_code", request.verification_code)
        .input("p_new_password", request.new_password)
        .input("p_new_password_confirm", request.new_password_confirm)
        .output("p_result_code")
        .output("p_result_message");

    let result = state.gateway.invoke(call).await?;
    Ok(Json(Envelope::output_only(result)))
}
