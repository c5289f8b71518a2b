//! # brewgate: HTTP gateway for the MyCoffee stored-procedure API
//!
//! `brewgate` is a thin JSON-over-HTTP gateway in front of a MySQL database. Handlers do
//! not contain business logic: each endpoint binds a JSON body to a typed request, maps
//! its fields onto a stored procedure's parameters, executes the procedure on a pooled
//! connection, and returns the procedure's outputs and result sets in a uniform envelope.
//! All business rules (code expiry, duplicate checks, password hashing, recommendation
//! ranking) live in the procedures.
//!
//! ## Request path
//!
//! 1. CORS and tracing middleware run.
//! 2. The JSON body is bound to a typed request; binding failures are 400s.
//! 3. Cheap width checks run in the handler (wide enough to never reject a value the
//!    procedure would accept).
//! 4. The procedure executes on a pooled connection with a bounded timeout.
//! 5. Output parameters are read back on the same connection.
//! 6. The response envelope is serialized; errors map to 400/500/504 per [`errors`].
//!
//! The connection pool is lazy: the first request that needs the database initializes it,
//! and a failed initialization leaves the pool uninitialized so a later request can retry.
//! See [`db::GatewayPool`].
//!
//! ## Quick start
//!
//! ```no_run
//! use clap::Parser;
//! use brewgate::{Application, Config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let args = brewgate::config::Args::parse();
//!     let config = Config::load(&args)?;
//!
//!     brewgate::telemetry::init_telemetry()?;
//!
//!     let app = Application::new(config)?;
//!     app.serve(async {
//!         tokio::signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
//!     })
//!     .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See the [`config`] module for configuration options, including the legacy flat
//! environment variables (`DB_HOST`, `PORT`, `NODE_ENV`, ...) kept for existing
//! deployments.

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
mod gateway;
mod openapi;
pub mod telemetry;

use axum::http::HeaderValue;
use axum::{
    Router, http,
    routing::{get, post},
};
use bon::Builder;
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;
pub use gateway::Gateway;

use crate::db::GatewayPool;
use crate::openapi::ApiDoc;

/// Application state shared across all request handlers.
///
/// Cloning is cheap: the gateway holds the pool behind an `Arc`.
#[derive(Clone, Builder)]
pub struct AppState {
    pub gateway: Gateway,
    pub config: Config,
}

/// Create CORS layer from configuration
fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origins = &config.cors.allowed_origins;

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let mut values = Vec::new();
        for origin in origins {
            values.push(origin.parse::<HeaderValue>()?);
        }
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([http::Method::GET, http::Method::POST])
        .allow_headers([http::header::CONTENT_TYPE]))
}

/// Build the application router with all endpoints and middleware.
///
/// Route paths mirror the deployed API surface: the phone and signup endpoints sit at the
/// root, the later additions under `/api`, and the raw OpenAPI document at
/// `/swagger.json`. The rendered docs UI is served at `/docs` and `/api-docs`.
#[instrument(skip_all)]
pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let openapi = ApiDoc::openapi();
    let openapi_json = openapi.to_json()?;

    let router = Router::new()
        .route("/phone/request", post(api::handlers::phone::request_code))
        .route("/phone/request-find-id", post(api::handlers::phone::request_find_id_code))
        .route("/phone/verify", post(api::handlers::phone::verify_code))
        .route("/signup", post(api::handlers::signup::signup))
        .route("/api/login/email", post(api::handlers::login::login_email))
        .route("/api/recommend", post(api::handlers::recommend::recommend))
        .route("/api/reset-password", post(api::handlers::password::reset_password))
        .route(
            "/users",
            get(api::handlers::users::list_users).post(api::handlers::users::create_user),
        )
        .route("/health", get(api::handlers::health::health))
        .route(
            "/swagger.json",
            get(move || {
                let body = openapi_json.clone();
                async move { ([(http::header::CONTENT_TYPE, "application/json")], body) }
            }),
        )
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", openapi.clone()))
        .merge(Scalar::with_url("/api-docs", openapi));

    let cors_layer = create_cors_layer(&state.config)?;

    Ok(router.layer(cors_layer).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    ))
}

/// Main application struct that owns the router, state, and lifecycle.
///
/// Construction is synchronous: the database pool is lazy, so no connection is made until
/// the first request that needs one. A server can start, serve `/health`, and publish its
/// docs while the database is still coming up.
pub struct Application {
    router: Router,
    app_state: AppState,
    config: Config,
}

impl Application {
    /// Create a new application instance. Does not touch the database.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting gateway with configuration: {:#?}", config);

        let pool = GatewayPool::new(config.database.clone());
        let gateway = Gateway::new(pool, config.statement_timeout, config.expose_error_detail());

        let app_state = AppState::builder().gateway(gateway).config(config.clone()).build();
        let router = build_router(app_state.clone())?;

        Ok(Self {
            router,
            app_state,
            config,
        })
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "Gateway listening on http://{}, docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.app_state.gateway.close().await;

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::{Args, Environment};
    use axum::http::StatusCode;
    use serde_json::json;

    fn test_config() -> Config {
        let mut config = Config::default();
        // Point at a closed port so database-touching tests fail fast instead of hanging
        config.database.host = "127.0.0.1".to_string();
        config.database.port = 1;
        config.database.pool.acquire_timeout_secs = 2;
        config.statement_timeout = std::time::Duration::from_secs(2);
        config
    }

    fn test_server(config: Config) -> axum_test::TestServer {
        Application::new(config).expect("Failed to build application").into_test_server()
    }

    #[tokio::test]
    async fn test_health_does_not_touch_database() {
        let server = test_server(test_config());

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        let first: chrono::DateTime<chrono::Utc> = serde_json::from_value(body["now"].clone()).unwrap();

        let body: serde_json::Value = server.get("/health").await.json();
        let second: chrono::DateTime<chrono::Utc> = serde_json::from_value(body["now"].clone()).unwrap();
        assert!(second >= first);
    }

    #[tokio::test]
    async fn test_swagger_json_is_served() {
        let server = test_server(test_config());

        let response = server.get("/swagger.json").await;
        response.assert_status(StatusCode::OK);

        let body: serde_json::Value = response.json();
        assert_eq!(body["info"]["title"], "MyCoffee API");
        assert!(body["paths"]["/signup"].is_object());
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_400() {
        let server = test_server(test_config());

        let response = server
            .post("/phone/request")
            .add_header("content-type", "application/json")
            .text("{not json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_missing_required_field_is_a_400() {
        let server = test_server(test_config());

        // phone_number is required
        let response = server.post("/phone/request").json(&json!({ "purpose": "SIGNUP" })).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_width_violation_is_a_400() {
        let server = test_server(test_config());

        let response = server
            .post("/phone/verify")
            .json(&json!({ "phone_number": "01012345678", "verification_code": "12345" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(body["error"].as_str().unwrap_or("").contains("verification_code"));
    }

    #[tokio::test]
    async fn test_unknown_purpose_is_a_400() {
        let server = test_server(test_config());

        let response = server
            .post("/phone/request")
            .json(&json!({ "phone_number": "01012345678", "purpose": "PASSWORD_RESET" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_a_500_with_detail_in_development() {
        let config = test_config();
        assert_eq!(config.environment, Environment::Development);
        let server = test_server(config);

        let response = server
            .post("/phone/request")
            .json(&json!({ "phone_number": "01012345678" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_unreachable_database_is_redacted_in_production() {
        let mut config = test_config();
        config.environment = Environment::Production;
        let server = test_server(config);

        let response = server
            .post("/api/login/email")
            .json(&json!({ "email": "user@example.com", "password": "hunter2" }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = response.json();
        assert!(body["error"].is_string());
        assert!(body["detail"].is_null());
    }

    #[test]
    fn test_cors_layer_accepts_wildcard_and_explicit_origins() {
        let config = Config::default();
        assert!(create_cors_layer(&config).is_ok());

        let mut config = Config::default();
        config.cors.allowed_origins = vec!["https://mycoffee.example".to_string()];
        assert!(create_cors_layer(&config).is_ok());
    }

    #[test]
    fn test_default_args_validate_flag_off() {
        use clap::Parser;
        let args = Args::parse_from(["brewgate"]);
        assert!(!args.validate);
        assert_eq!(args.config, "config.yaml");
    }
}
