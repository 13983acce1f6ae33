//! External media host (ImageKit) used to store uploaded images.

pub mod imagekit;
pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use imagekit::ImageKitClient;
pub use memory::MemoryMediaStore;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Media host is not configured: {0}")]
    NotConfigured(&'static str),

    #[error("Only image files are allowed (got {0})")]
    UnsupportedType(String),

    #[error("Upload rejected by media host ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// An image file received from a client, held in memory.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Result<Self, MediaError> {
        let content_type = content_type.into();
        if !content_type.starts_with("image/") {
            return Err(MediaError::UnsupportedType(content_type));
        }
        Ok(Self {
            file_name: file_name.into(),
            content_type,
            bytes,
        })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Result of a successful upload, as reported by the media host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub file_id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    pub file_path: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub size: Option<u64>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(&self, image: UploadedImage, folder: &str) -> Result<StoredImage, MediaError>;
}

/// Upload every image concurrently; result order matches input order.
pub async fn upload_all(
    store: &dyn MediaStore,
    images: Vec<UploadedImage>,
    folder: &str,
) -> Result<Vec<StoredImage>, MediaError> {
    futures::future::try_join_all(images.into_iter().map(|image| store.upload(image, folder))).await
}

/// Folder layout on the media host.
pub mod folders {
    pub fn artworks(username: &str) -> String {
        format!("{}/artworks", username)
    }

    pub fn projects(username: &str) -> String {
        format!("{}/projects", username)
    }

    pub fn profile(username: &str) -> String {
        username.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_image_content_type() {
        let err = UploadedImage::new("notes.txt", "text/plain", vec![1]).unwrap_err();
        assert!(matches!(err, MediaError::UnsupportedType(t) if t == "text/plain"));
    }

    #[test]
    fn stored_image_parses_imagekit_response() {
        let body = serde_json::json!({
            "fileId": "f1",
            "name": "a.png",
            "url": "https://ik.imagekit.io/demo/alice/artworks/a.png",
            "thumbnailUrl": "https://ik.imagekit.io/demo/tr:n-ik_ml_thumbnail/alice/artworks/a.png",
            "filePath": "/alice/artworks/a.png",
            "height": 10,
            "width": 20,
            "size": 300,
            "fileType": "image"
        });
        let stored: StoredImage = serde_json::from_value(body).unwrap();
        assert_eq!(stored.file_path, "/alice/artworks/a.png");
        assert_eq!(stored.width, Some(20));
    }

    #[test]
    fn folder_layout() {
        assert_eq!(folders::artworks("alice"), "alice/artworks");
        assert_eq!(folders::projects("alice"), "alice/projects");
        assert_eq!(folders::profile("alice"), "alice");
    }

    #[tokio::test]
    async fn upload_all_preserves_order() {
        let store = MemoryMediaStore::new("https://media.test");
        let images = vec![
            UploadedImage::new("one.png", "image/png", vec![1]).unwrap(),
            UploadedImage::new("two.png", "image/png", vec![2]).unwrap(),
        ];
        let stored = upload_all(&store, images, "bob/projects").await.unwrap();
        let names: Vec<_> = stored.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["one.png", "two.png"]);
        assert_eq!(store.uploads(), 2);
    }
}
