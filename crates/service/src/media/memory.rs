use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{MediaFile, MediaStore};
use crate::errors::ServiceError;

/// In-process media store for tests and local demos. URLs point at a fake host.
#[derive(Default)]
pub struct MemoryMediaStore {
    uploaded: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MemoryMediaStore {
    /// A store whose every upload is rejected.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().await.clone()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, folder: &str, file: MediaFile) -> Result<String, ServiceError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(ServiceError::Upstream("Error uploading images".into()));
        }
        let mut uploaded = self.uploaded.lock().await;
        let name = file.file_name.unwrap_or_else(|| "upload".into());
        let url = format!("https://media.test/{folder}/{}-{name}", uploaded.len());
        uploaded.push(url.clone());
        Ok(url)
    }
}
