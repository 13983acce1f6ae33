use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info};

use super::{MediaError, MediaStore, StoredImage, UploadedImage};
use crate::config::MediaConfig;

/// ImageKit upload API client.
///
/// Authenticates with the private key as the basic-auth user name and an
/// empty password. Every upload is bounded by `upload_timeout_secs`.
#[derive(Clone)]
pub struct ImageKitClient {
    http: reqwest::Client,
    upload_url: String,
    private_key: String,
    timeout: Duration,
}

impl ImageKitClient {
    pub fn new(config: &MediaConfig) -> Result<Self, MediaError> {
        if config.private_key.is_empty() {
            return Err(MediaError::NotConfigured("IMAGEKIT_PRIVATE_KEY"));
        }
        url::Url::parse(&config.upload_url).map_err(|_| MediaError::NotConfigured("IMAGEKIT_UPLOAD_URL"))?;

        let timeout = Duration::from_secs(config.upload_timeout_secs.max(1));
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            upload_url: config.upload_url.clone(),
            private_key: config.private_key.clone(),
            timeout,
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn form(image: UploadedImage, folder: &str) -> Result<Form, MediaError> {
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;

        Ok(Form::new()
            .part("file", part)
            .text("fileName", image.file_name)
            .text("folder", folder.to_string()))
    }
}

impl std::fmt::Debug for ImageKitClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageKitClient")
            .field("upload_url", &self.upload_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MediaStore for ImageKitClient {
    async fn upload(&self, image: UploadedImage, folder: &str) -> Result<StoredImage, MediaError> {
        debug!("Uploading {} ({} bytes) to {}", image.file_name, image.size(), folder);

        let response = self
            .http
            .post(&self.upload_url)
            .basic_auth(&self.private_key, Some(""))
            .multipart(Self::form(image, folder)?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected { status: status.as_u16(), body });
        }

        let stored: StoredImage = response.json().await?;
        info!("Uploaded image {} -> {}", stored.file_id, stored.url);
        Ok(stored)
    }
}
