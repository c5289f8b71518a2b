//! Email login endpoint, backed by `PRC_COF_USER_LOGIN`. Password verification and
//! session issuance are procedure-side; the envelope is output-only.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::Envelope;
use crate::api::models::login::LoginRequest;
use crate::db::ProcedureCall;
use crate::errors::Error;

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/login/email",
    tag = "account",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login result; on SUCCESS output.p_user_id and output.p_session_id are set", body = Envelope),
        (status = 400, description = "Malformed body or width violation"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login_email(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<Json<Envelope>, Error> {
    request.validate()?;

    let call = ProcedureCall::new("PRC_COF_USER_LOGIN")
        .input("p_email", request.email)
        .input("p_password", request.password)
        .input("p_auto_login", request.auto_login)
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
    Ok(Json(Envelope::output_only(result)))
}
