pub mod auth;
pub mod comments;
pub mod listings;
pub mod users;

use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use common::{metrics, types::Health};
use models::ListingKind;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use self::auth::protect;
use crate::openapi::ApiDoc;
use crate::state::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics_handler() -> impl IntoResponse {
    metrics::encode_metrics()
}

async fn track_metrics(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let response = next.run(req).await;
    metrics::REQUESTS_TOTAL.inc();
    metrics::REQUEST_DURATION.observe(started.elapsed().as_secs_f64());
    response
}

/// Build the full application router: listing kinds, comments, auth and
/// users, plus health, metrics and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    for kind in ListingKind::ALL {
        app = app.nest(&format!("/{}", kind.route_segment()), listings::router(kind, &state));
    }

    // Comments
    app = app
        .route("/comments", get(comments::list).merge(protect(&state, post(comments::create))))
        .route("/comments/:kind/:id", get(comments::list_for_listing))
        .route("/comments/:id", protect(&state, delete(comments::remove)));

    // Auth and users; signup and login stay open
    app = app
        .route("/login", post(auth::login))
        .route("/google", get(auth::google))
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get_one).merge(protect(&state, put(users::update))))
        .route("/users/isActive/:id", protect(&state, patch(users::toggle_active)));

    if let Some(dir) = &state.http.uploads_dir {
        app = app.nest_service("/uploads", ServeDir::new(dir));
    }

    let body_limit = state.http.max_upload_bytes;
    app.with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(track_metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
