//! Extractors whose rejections render as `{"message": ...}` like every
//! other error the API returns.
use axum::async_trait;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Multipart, Request};
use axum::http::StatusCode;

use crate::errors::JsonApiError;

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(JsonApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(JsonApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(JsonApiError))]
pub struct ApiQuery<T>(pub T);

/// Repeated keys collect into a `Vec` (`?categories=a&categories=b`).
#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(JsonApiError))]
pub struct ApiMultiQuery<T>(pub T);

pub struct ApiMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(ApiMultipart)
            .map_err(|e| rejected(e.status(), e.body_text()))
    }
}

/// Malformed input is a 400; other statuses (415, 413, ...) are kept.
fn rejected(status: StatusCode, message: String) -> JsonApiError {
    let status = if status == StatusCode::UNPROCESSABLE_ENTITY { StatusCode::BAD_REQUEST } else { status };
    JsonApiError::new(status, message)
}

impl From<JsonRejection> for JsonApiError {
    fn from(e: JsonRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(e: PathRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

impl From<QueryRejection> for JsonApiError {
    fn from(e: QueryRejection) -> Self {
        rejected(e.status(), e.body_text())
    }
}

impl From<axum_extra::extract::QueryRejection> for JsonApiError {
    fn from(e: axum_extra::extract::QueryRejection) -> Self {
        JsonApiError::new(StatusCode::BAD_REQUEST, e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unprocessable_becomes_bad_request() {
        let e = rejected(StatusCode::UNPROCESSABLE_ENTITY, "missing field `stars`".into());
        assert_eq!(e.status, StatusCode::BAD_REQUEST);
        assert_eq!(rejected(StatusCode::UNSUPPORTED_MEDIA_TYPE, "x".into()).status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
