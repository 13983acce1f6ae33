use std::sync::Arc;

use super::ServiceError;
use crate::app::AppState;
use crate::database::models::Artwork;
use crate::database::repository::ArtworkWrite;
use crate::database::{ArtworkRepository, DatabaseError};
use crate::media::{folders, MediaStore, UploadedImage};
use crate::middleware::AuthUser;

pub struct ArtworkService {
    artworks: ArtworkRepository,
    media: Arc<dyn MediaStore>,
}

impl ArtworkService {
    pub fn new(artworks: ArtworkRepository, media: Arc<dyn MediaStore>) -> Self {
        Self { artworks, media }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.artworks(), state.media.clone())
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        image: UploadedImage,
        write: ArtworkWrite,
    ) -> Result<Artwork, ServiceError> {
        let stored = self.media.upload(image, &folders::artworks(&user.username)).await?;
        Ok(self.artworks.create(user.user_id, &stored.url, write).await?)
    }

    /// Ownership is checked before any new image is uploaded.
    pub async fn update(
        &self,
        id: i32,
        user: &AuthUser,
        image: Option<UploadedImage>,
        write: ArtworkWrite,
    ) -> Result<Artwork, ServiceError> {
        let existing = self.artworks.find_404(id).await?;
        if existing.user_id != user.user_id {
            return Err(DatabaseError::NotFound("Artwork not found or unauthorized".to_string()).into());
        }

        let image_path = match image {
            Some(image) => Some(self.media.upload(image, &folders::artworks(&user.username)).await?.url),
            None => None,
        };

        Ok(self
            .artworks
            .update(id, user.user_id, image_path.as_deref(), write)
            .await?)
    }
}
