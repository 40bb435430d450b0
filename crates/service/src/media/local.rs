//! Disk-backed media store. Files land in `media.local_dir/<folder>/` and are
//! served by the HTTP layer under `/uploads`.
use std::path::PathBuf;

use async_trait::async_trait;
use configs::MediaConfig;
use tracing::debug;
use uuid::Uuid;

use super::{MediaFile, MediaStore};
use crate::errors::ServiceError;

pub struct LocalStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self { root: root.into(), public_base_url: public_base_url.trim_end_matches('/').to_string() }
    }

    pub fn from_config(cfg: &MediaConfig) -> Self {
        Self::new(&cfg.local_dir, &cfg.public_base_url)
    }
}

fn extension(file: &MediaFile) -> &str {
    let from_name = file
        .file_name
        .as_deref()
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    match from_name {
        Some(ext) => ext,
        None => match file.content_type.as_str() {
            "image/png" => "png",
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "bin",
        },
    }
}

#[async_trait]
impl MediaStore for LocalStore {
    async fn upload(&self, folder: &str, file: MediaFile) -> Result<String, ServiceError> {
        let dir = self.root.join(folder);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ServiceError::Upstream(format!("cannot create {}: {e}", dir.display())))?;
        let name = format!("{}.{}", Uuid::new_v4(), extension(&file));
        let path = dir.join(&name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| ServiceError::Upstream(format!("cannot write {}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = file.bytes.len(), "image stored on disk");
        Ok(format!("{}/uploads/{folder}/{name}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_file_and_returns_public_url() {
        let root = std::env::temp_dir().join(format!("local-store-{}", Uuid::new_v4()));
        let store = LocalStore::new(&root, "http://localhost:3000/");
        let url = store
            .upload("hotels_images", MediaFile::new(Some("front.jpeg".into()), Some("image/jpeg".into()), b"img".to_vec()))
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:3000/uploads/hotels_images/"));
        assert!(url.ends_with(".jpeg"));
        let name = url.rsplit('/').next().unwrap();
        let stored = tokio::fs::read(root.join("hotels_images").join(name)).await.unwrap();
        assert_eq!(stored, b"img");
        let _ = tokio::fs::remove_dir_all(&root).await;
    }

    #[test]
    fn extension_falls_back_to_content_type() {
        let f = MediaFile::new(None, Some("image/webp".into()), vec![]);
        assert_eq!(extension(&f), "webp");
        let f = MediaFile::new(Some("../../etc/passwd".into()), None, vec![]);
        assert_eq!(extension(&f), "bin");
    }
}
