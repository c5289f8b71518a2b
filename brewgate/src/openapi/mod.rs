//! OpenAPI/Swagger documentation.
//!
//! The raw document is served at `/swagger.json`; the rendered UI is available at both
//! `/docs` and `/api-docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MyCoffee API",
        description = "Coffee recommendation service signup/verification gateway. \
                       Business outcomes are reported through `output.p_result_code` inside 200 responses; \
                       5xx statuses indicate gateway or database failures.",
        version = "1.0.0",
    ),
    paths(
        api::handlers::phone::request_code,
        api::handlers::phone::request_find_id_code,
        api::handlers::phone::verify_code,
        api::handlers::signup::signup,
        api::handlers::login::login_email,
        api::handlers::recommend::recommend,
        api::handlers::password::reset_password,
        api::handlers::users::list_users,
        api::handlers::users::create_user,
        api::handlers::health::health,
    ),
    components(schemas(
        api::models::Envelope,
        api::models::phone::PhoneCodeRequest,
        api::models::phone::FindIdCodeRequest,
        api::models::phone::PhoneVerifyRequest,
        api::models::phone::Purpose,
        api::models::signup::SignupRequest,
        api::models::signup::ValidationMode,
        api::models::signup::Gender,
        api::models::signup::DeviceType,
        api::models::login::LoginRequest,
        api::models::recommend::RecommendRequest,
        api::models::password::ResetPasswordRequest,
        api::models::users::UserCreate,
        api::models::users::UserCreated,
        api::handlers::health::HealthResponse,
    )),
    tags(
        (name = "phone", description = "Phone verification"),
        (name = "account", description = "Signup, login, password reset"),
        (name = "recommend", description = "Blend recommendation"),
        (name = "users", description = "Plain-SQL user records"),
        (name = "meta", description = "Service metadata"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_covers_all_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/phone/request",
            "/phone/request-find-id",
            "/phone/verify",
            "/signup",
            "/api/login/email",
            "/api/recommend",
            "/api/reset-password",
            "/users",
            "/health",
        ] {
            assert!(paths.contains(&expected), "missing path {expected}");
        }
    }

    #[test]
    fn test_document_serializes() {
        let json = ApiDoc::openapi().to_json().unwrap();
        assert!(json.contains("MyCoffee API"));
    }
}
