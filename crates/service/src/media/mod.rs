//! Media host abstraction for listing images.
//!
//! A listing request may carry several files; [`upload_all`] pushes them
//! concurrently and returns the public URLs in input order.

pub mod cloudinary;
pub mod local;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use configs::{MediaBackend, MediaConfig};
use futures::future::try_join_all;
use tracing::{info, warn};

use crate::errors::ServiceError;

pub use cloudinary::CloudinaryStore;
pub use local::LocalStore;
pub use memory::MemoryMediaStore;

/// One uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl MediaFile {
    pub fn new(file_name: Option<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            content_type: content_type.unwrap_or_else(|| "application/octet-stream".into()),
            bytes,
        }
    }
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `file` under `folder` and return its public URL.
    async fn upload(&self, folder: &str, file: MediaFile) -> Result<String, ServiceError>;
}

/// Upload every file concurrently. The first failure fails the batch.
pub async fn upload_all(
    store: &dyn MediaStore,
    folder: &str,
    files: Vec<MediaFile>,
) -> Result<Vec<String>, ServiceError> {
    if files.is_empty() {
        return Ok(Vec::new());
    }
    let count = files.len();
    let urls = try_join_all(files.into_iter().map(|f| async move {
        let res = store.upload(folder, f).await;
        match &res {
            Ok(_) => common::metrics::MEDIA_UPLOADS_TOTAL.inc(),
            Err(e) => {
                common::metrics::MEDIA_UPLOAD_ERRORS_TOTAL.inc();
                warn!(error = %e, %folder, "media_upload_failed");
            }
        }
        res
    }))
    .await?;
    info!(%folder, count, "media_uploaded");
    Ok(urls)
}

/// Build the store selected by `media.backend`.
pub fn from_config(cfg: &MediaConfig) -> Result<Arc<dyn MediaStore>, ServiceError> {
    match cfg.backend {
        MediaBackend::Cloudinary => Ok(Arc::new(CloudinaryStore::from_config(cfg)?)),
        MediaBackend::Local => Ok(Arc::new(LocalStore::from_config(cfg))),
    }
}
