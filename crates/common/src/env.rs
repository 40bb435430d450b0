//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use tracing::{info, warn};

/// Ensure the local upload directory exists when disk-backed media is used.
pub async fn ensure_upload_dir(upload_dir: Option<&str>) -> anyhow::Result<()> {
    let Some(dir) = upload_dir else {
        return Ok(());
    };
    if dir.trim().is_empty() {
        warn!("media.local_dir is empty; uploads will be written to the working directory");
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {dir}: {e}"))?;
    info!(%dir, "upload directory ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_upload_dir() {
        let dir = std::env::temp_dir().join(format!("uploads-{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_upload_dir(Some(&path)).await.unwrap();
        assert!(tokio::fs::metadata(&dir).await.unwrap().is_dir());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn no_dir_is_a_no_op() {
        ensure_upload_dir(None).await.unwrap();
    }
}
