//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use configs::{MediaBackend, MediaConfig};

/// Ensure the directories the selected media backend writes to exist.
pub async fn ensure_env(media: &MediaConfig) -> anyhow::Result<()> {
    let dir = (media.backend == MediaBackend::Local).then_some(media.local_dir.as_str());
    common::env::ensure_upload_dir(dir).await
}
