use std::path::PathBuf;
use std::sync::Arc;

use service::auth::repository::UserRepository;
use service::auth::{AuthService, IdentityVerifier, TokenConfig};
use service::comment::{CommentRepository, CommentService};
use service::listing::{ListingRepository, ListingService};
use service::media::MediaStore;
use service::user_service::UserService;

/// HTTP-level switches taken from `[server]`, `[auth]` and `[media]`.
#[derive(Clone, Debug)]
pub struct HttpOptions {
    pub protect_mutations: bool,
    pub max_upload_bytes: usize,
    /// Served under `/uploads` (local media backend only).
    pub uploads_dir: Option<PathBuf>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self { protect_mutations: false, max_upload_bytes: 20 * 1024 * 1024, uploads_dir: None }
    }
}

impl HttpOptions {
    pub fn from_config(cfg: &configs::AppConfig) -> Self {
        let uploads_dir = match cfg.media.backend {
            configs::MediaBackend::Local => Some(PathBuf::from(&cfg.media.local_dir)),
            configs::MediaBackend::Cloudinary => None,
        };
        Self {
            protect_mutations: cfg.auth.protect_mutations,
            max_upload_bytes: cfg.server.max_upload_bytes,
            uploads_dir,
        }
    }
}

pub struct Repositories {
    pub listings: Arc<dyn ListingRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    /// Back every repository with the same store.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ListingRepository + CommentRepository + UserRepository + 'static,
    {
        Self { listings: store.clone(), comments: store.clone(), users: store }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub listings: Arc<ListingService>,
    pub comments: Arc<CommentService>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub http: HttpOptions,
}

impl ServerState {
    pub fn new(
        repos: Repositories,
        media: Arc<dyn MediaStore>,
        verifier: Arc<dyn IdentityVerifier>,
        tokens: TokenConfig,
        http: HttpOptions,
    ) -> Self {
        Self {
            listings: Arc::new(ListingService::new(repos.listings.clone(), media)),
            comments: Arc::new(CommentService::new(repos.comments, repos.listings)),
            auth: Arc::new(AuthService::new(repos.users.clone(), verifier, tokens)),
            users: Arc::new(UserService::new(repos.users)),
            http,
        }
    }
}
