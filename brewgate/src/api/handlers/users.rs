//! Plain-SQL `/users` endpoints: the simpler variant of the gateway contract with no
//! output parameters, only row sequences and generated identifiers.

use axum::{Json, extract::State};

use crate::AppState;
use crate::api::JsonBody;
use crate::api::models::users::{UserCreate, UserCreated};
use crate::db::JsonMap;
use crate::errors::Error;

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "User rows", body = Vec<Object>),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<JsonMap>>, Error> {
    let rows = state.gateway.query_rows("SELECT id, name, email FROM users", vec![]).await?;
    Ok(Json(rows))
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserCreate,
    responses(
        (status = 200, description = "Created user with generated id", body = UserCreated),
        (status = 400, description = "Malformed body"),
        (status = 500, description = "Gateway or database failure"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_user(State(state): State<AppState>, JsonBody(request): JsonBody<UserCreate>) -> Result<Json<UserCreated>, Error> {
    let insert = state
        .gateway
        .insert(
            "INSERT INTO users (name, email) VALUES (?, ?)",
            vec![request.name.clone().into(), request.email.clone().into()],
        )
        .await?;

    Ok(Json(UserCreated {
        id: insert.last_insert_id,
        name: request.name,
        email: request.email,
    }))
}
