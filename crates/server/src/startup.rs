use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::auth::repo::SeaOrmUserRepository;
use service::auth::{GoogleTokenInfoVerifier, TokenConfig};
use service::comment::repo::SeaOrmCommentRepository;
use service::listing::repo::SeaOrmListingRepository;
use service::{media, runtime};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::{HttpOptions, Repositories, ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Wire the SeaORM repositories, media store and Google verifier into
/// the application router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    runtime::ensure_env(&cfg.media).await?;

    let db = models::db::connect_with_config(&cfg.database).await?;
    Migrator::up(&db, None).await?;

    let repos = Repositories {
        listings: Arc::new(SeaOrmListingRepository { db: db.clone() }),
        comments: Arc::new(SeaOrmCommentRepository { db: db.clone() }),
        users: Arc::new(SeaOrmUserRepository { db }),
    };
    let media_store = media::from_config(&cfg.media)?;
    let verifier = Arc::new(GoogleTokenInfoVerifier::from_config(&cfg.auth));
    let state = ServerState::new(
        repos,
        media_store,
        verifier,
        TokenConfig::from_config(&cfg.auth),
        HttpOptions::from_config(cfg),
    );
    Ok(routes::build_router(state, build_cors()))
}

/// Build the app and serve it until the task is cancelled.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.to_string(), source })?;
    info!(%addr, media = ?cfg.media.backend, protect_mutations = cfg.auth.protect_mutations, "starting directory server");
    axum::serve(listener, app).await?;
    Ok(())
}
