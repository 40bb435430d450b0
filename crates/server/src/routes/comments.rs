use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use models::{comment, ListingKind};
use service::comment::{CommentView, CreateCommentInput};
use service::ServiceError;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath};
use crate::state::ServerState;

#[utoipa::path(get, path = "/comments", tag = "comments", responses((status = 200, description = "OK", body = [crate::openapi::CommentDoc])))]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<comment::Model>>, JsonApiError> {
    Ok(Json(state.comments.list_all().await?))
}

#[utoipa::path(
    get,
    path = "/comments/{kind}/{id}",
    tag = "comments",
    params(
        ("kind" = String, Path, description = "restaurant, hotel, taxi, gym, supermarket, tourism, movieTheater or emergency"),
        ("id" = Uuid, Path, description = "Listing id"),
    ),
    responses((status = 200, description = "Comments with author first name", body = [crate::openapi::CommentViewDoc]), (status = 404, description = "Unknown kind"))
)]
pub async fn list_for_listing(
    State(state): State<ServerState>,
    ApiPath((segment, id)): ApiPath<(String, Uuid)>,
) -> Result<Json<Vec<CommentView>>, JsonApiError> {
    let kind = ListingKind::from_comment_segment(&segment).ok_or_else(|| ServiceError::not_found("Listing kind"))?;
    Ok(Json(state.comments.list_for_listing(kind, id).await?))
}

#[utoipa::path(
    post,
    path = "/comments",
    tag = "comments",
    request_body = crate::openapi::CreateCommentRequest,
    responses(
        (status = 200, description = "Stored comment", body = crate::openapi::CommentDoc),
        (status = 400, description = "Invalid body"),
        (status = 404, description = "Listing not found"),
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<CreateCommentInput>,
) -> Result<Json<comment::Model>, JsonApiError> {
    Ok(Json(state.comments.create(input).await?))
}

#[utoipa::path(
    delete,
    path = "/comments/{id}",
    tag = "comments",
    params(("id" = Uuid, Path, description = "Comment id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Comment not found"))
)]
pub async fn remove(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    state.comments.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
