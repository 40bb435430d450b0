use axum::{
    extract::State,
    Json,
};
use models::user;
use serde_json::Value;
use service::auth::domain::{RegisterInput, UpdateUserInput};
use uuid::Uuid;

use super::auth::user_with_token;
use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::ServerState;

#[utoipa::path(get, path = "/users", tag = "users", responses((status = 200, description = "Non-admin users", body = [crate::openapi::UserDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(state.users.list().await?))
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 404, description = "User not found"))
)]
pub async fn get_one(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.get(id).await?))
}

/// Signup. Responds with the user and a fresh token.
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = crate::openapi::RegisterRequest,
    responses(
        (status = 200, description = "User created with token"),
        (status = 400, description = "Invalid field"),
        (status = 409, description = "Este email ya existe"),
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<RegisterInput>,
) -> Result<Json<Value>, JsonApiError> {
    let session = state.auth.register(input).await?;
    Ok(Json(user_with_token(session)?))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = crate::openapi::UpdateUserRequest,
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 404, description = "User not found"), (status = 409, description = "Email taken"))
)]
pub async fn update(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.update(id, input).await?))
}

#[utoipa::path(
    patch,
    path = "/users/isActive/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses((status = 200, description = "OK", body = crate::openapi::UserDoc), (status = 404, description = "User not found"))
)]
pub async fn toggle_active(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<user::Model>, JsonApiError> {
    Ok(Json(state.users.toggle_active(id).await?))
}
