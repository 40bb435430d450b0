use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::MethodRouter,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service::auth::domain::{AuthSession, LoginInput};
use service::auth::errors::AuthError;
use tracing::debug;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;
use crate::state::ServerState;

pub const LOGIN_MESSAGE: &str = "Start session successfully";
pub const GOOGLE_LOGIN_MESSAGE: &str = "Starting session successfully";

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub email: String,
    pub name: String,
    pub id: Uuid,
}

impl SessionResponse {
    fn new(message: &str, session: AuthSession) -> Self {
        Self {
            message: message.to_string(),
            token: session.token,
            email: session.user.email,
            name: session.user.name,
            id: session.user.id,
        }
    }
}

/// The user object with its `token` added alongside the user fields.
pub(crate) fn user_with_token(session: AuthSession) -> Result<Value, JsonApiError> {
    let mut body = serde_json::to_value(&session.user)
        .map_err(|e| JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    if let Value::Object(map) = &mut body {
        map.insert("token".into(), Value::String(session.token));
    }
    Ok(body)
}

/// Token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body = crate::openapi::LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 401, description = "email or password incorrect"),
    )
)]
pub async fn login(
    State(state): State<ServerState>,
    ApiJson(input): ApiJson<LoginInput>,
) -> Result<Json<SessionResponse>, JsonApiError> {
    let session = state.auth.login(input).await?;
    Ok(Json(SessionResponse::new(LOGIN_MESSAGE, session)))
}

#[utoipa::path(
    get,
    path = "/google",
    tag = "auth",
    responses(
        (status = 200, description = "Existing user signed in", body = SessionResponse),
        (status = 201, description = "User created from the Google identity"),
        (status = 401, description = "Missing or rejected Google token"),
    )
)]
pub async fn google(State(state): State<ServerState>, headers: HeaderMap) -> Result<Response, JsonApiError> {
    let id_token = bearer_token(&headers).ok_or(AuthError::MissingToken)?;
    let (session, created) = state.auth.login_with_google(id_token).await?;
    if created {
        return Ok((StatusCode::CREATED, Json(user_with_token(session)?)).into_response());
    }
    Ok(Json(SessionResponse::new(GOOGLE_LOGIN_MESSAGE, session)).into_response())
}

/// Reject requests without a valid bearer JWT: 401 when the header is
/// missing or malformed, 403 when the token does not verify.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let claims = {
        let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
        state.auth.verify_token(token)?
    };
    debug!(user_id = %claims.sub, path = %req.uri().path(), "bearer token accepted");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Guard a mutating route when `auth.protect_mutations` is on.
pub fn protect(state: &ServerState, route: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    if state.http.protect_mutations {
        route.route_layer(middleware::from_fn_with_state(state.clone(), require_bearer_token))
    } else {
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_token_needs_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        assert_eq!(bearer_token(&headers), Some("abc.def"));
    }
}
