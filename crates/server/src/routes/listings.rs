//! Routes shared by every listing kind. Each kind gets its own copy of
//! [`router`] mounted under its route segment, with the kind injected as an
//! `Extension`.
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use models::{Listing, ListingKind};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use service::listing::{ListingForm, ListingPage};
use service::media::MediaFile;
use service::Pagination;
use tracing::debug;
use uuid::Uuid;

use super::auth::protect;
use crate::errors::JsonApiError;
use crate::extract::{ApiMultiQuery, ApiMultipart, ApiPath, ApiQuery};
use crate::state::ServerState;

/// Multipart field carrying image files.
const IMAGES_FIELD: &str = "images";

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// `categories` may repeat (`?categories=a&categories=b`).
#[derive(Debug, Default, Deserialize)]
pub struct CategoryParams {
    #[serde(default)]
    pub categories: Vec<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub fn router(kind: ListingKind, state: &ServerState) -> Router<ServerState> {
    let mut router = Router::new()
        .route("/", get(list).merge(protect(state, axum::routing::post(create))))
        .route("/isActive/:id", protect(state, patch(toggle_active)))
        .route(
            "/:id",
            get(list_by_owner).merge(protect(state, axum::routing::put(update).delete(remove))),
        );
    if kind.has_categories() {
        router = router.route("/categories", get(list_by_category));
    }
    router.layer(Extension(kind))
}

/// `{currentPage, totalResults, <kind>: [...]}`
fn page_body(kind: ListingKind, page: ListingPage) -> Json<Value> {
    let mut body = Map::new();
    body.insert("currentPage".into(), json!(page.current_page));
    body.insert("totalResults".into(), json!(page.total_results));
    body.insert(kind.route_segment().into(), json!(page.items));
    Json(Value::Object(body))
}

/// Split a multipart body into listing fields and image files.
async fn read_form(mut multipart: Multipart) -> Result<(ListingForm, Vec<MediaFile>), JsonApiError> {
    let mut form = ListingForm::default();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == IMAGES_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?;
            if !bytes.is_empty() {
                files.push(MediaFile::new(file_name, content_type, bytes.to_vec()));
            }
        } else {
            let value = field.text().await?;
            if !form.set(&name, value) {
                debug!(field = %name, "ignoring unknown form field");
            }
        }
    }
    Ok((form, files))
}

#[utoipa::path(
    get,
    path = "/{kind}",
    tag = "listings",
    params(
        ("kind" = String, Path, description = "restaurants, hotels, taxis, gyms, supermarkets, tourisms, movieTheaters or emergencies"),
        ("search" = Option<String>, Query, description = "Case-insensitive name substring"),
        ("page" = Option<String>, Query, description = "1-based page, default 1"),
        ("limit" = Option<String>, Query, description = "Page size, default 10"),
    ),
    responses((status = 200, description = "Page of active listings", body = crate::openapi::ListingPageDoc))
)]
pub async fn list(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiQuery(params): ApiQuery<SearchParams>,
) -> Result<Json<Value>, JsonApiError> {
    let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref());
    let result = state.listings.list_active(kind, params.search.as_deref(), page).await?;
    Ok(page_body(kind, result))
}

#[utoipa::path(
    get,
    path = "/{kind}/categories",
    tag = "listings",
    params(
        ("kind" = String, Path, description = "Any kind except movieTheaters"),
        ("categories" = Vec<String>, Query, description = "Repeatable; a listing matches when it shares one"),
        ("page" = Option<String>, Query, description = "Paginates only together with limit"),
        ("limit" = Option<String>, Query, description = "Page size"),
    ),
    responses(
        (status = 200, description = "Matching active listings", body = crate::openapi::ListingPageDoc),
        (status = 400, description = "Missing or unknown categories"),
        (status = 404, description = "No listing on this page"),
    )
)]
pub async fn list_by_category(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiMultiQuery(params): ApiMultiQuery<CategoryParams>,
) -> Result<Json<Value>, JsonApiError> {
    let page = Pagination::strict(params.page.as_deref(), params.limit.as_deref());
    let result = state.listings.list_by_category(kind, &params.categories, page).await?;
    Ok(page_body(kind, result))
}

#[utoipa::path(
    get,
    path = "/{kind}/{id}",
    tag = "listings",
    params(("kind" = String, Path, description = "Listing kind route segment"), ("id" = Uuid, Path, description = "Owner user id")),
    responses((status = 200, description = "Listings owned by the user", body = [crate::openapi::ListingDoc]))
)]
pub async fn list_by_owner(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<Vec<Listing>>, JsonApiError> {
    Ok(Json(state.listings.list_by_owner(kind, user_id).await?))
}

#[utoipa::path(
    post,
    path = "/{kind}",
    tag = "listings",
    params(("kind" = String, Path, description = "Listing kind route segment")),
    request_body(content = crate::openapi::ListingFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Created", body = crate::openapi::ListingDoc),
        (status = 400, description = "Missing or malformed field"),
        (status = 500, description = "Media host failure"),
    )
)]
pub async fn create(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<Listing>, JsonApiError> {
    let (form, files) = read_form(multipart).await?;
    Ok(Json(state.listings.create(kind, form, files).await?))
}

#[utoipa::path(
    put,
    path = "/{kind}/{id}",
    tag = "listings",
    params(("kind" = String, Path, description = "Listing kind route segment"), ("id" = Uuid, Path, description = "Listing id")),
    request_body(content = crate::openapi::ListingFormDoc, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ListingDoc),
        (status = 404, description = "Not found"),
    )
)]
pub async fn update(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiMultipart(multipart): ApiMultipart,
) -> Result<Json<Listing>, JsonApiError> {
    let (form, files) = read_form(multipart).await?;
    Ok(Json(state.listings.update(kind, id, form, files).await?))
}

#[utoipa::path(
    patch,
    path = "/{kind}/isActive/{id}",
    tag = "listings",
    params(("kind" = String, Path, description = "Listing kind route segment"), ("id" = Uuid, Path, description = "Listing id")),
    responses((status = 200, description = "Toggled", body = crate::openapi::ListingDoc), (status = 404, description = "Not found"))
)]
pub async fn toggle_active(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Listing>, JsonApiError> {
    Ok(Json(state.listings.toggle_active(kind, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{kind}/{id}",
    tag = "listings",
    params(("kind" = String, Path, description = "Listing kind route segment"), ("id" = Uuid, Path, description = "Listing id")),
    responses((status = 204, description = "Deleted"), (status = 404, description = "Not found"))
)]
pub async fn remove(
    Extension(kind): Extension<ListingKind>,
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, JsonApiError> {
    state.listings.delete(kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
