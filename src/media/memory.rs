use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{MediaError, MediaStore, StoredImage, UploadedImage};

/// Media store that keeps nothing and hands out URLs under `base_url`.
///
/// Used when no ImageKit credentials are configured in development, and in
/// tests.
#[derive(Debug)]
pub struct MemoryMediaStore {
    base_url: String,
    next_id: AtomicU64,
}

impl MemoryMediaStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn uploads(&self) -> u64 {
        self.next_id.load(Ordering::SeqCst) - 1
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(&self, image: UploadedImage, folder: &str) -> Result<StoredImage, MediaError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let file_path = format!("/{}/{}_{}", folder.trim_matches('/'), id, image.file_name);
        Ok(StoredImage {
            file_id: format!("mem-{}", id),
            name: image.file_name.clone(),
            url: format!("{}{}", self.base_url, file_path),
            thumbnail_url: None,
            file_path,
            width: None,
            height: None,
            size: Some(image.size() as u64),
        })
    }
}
