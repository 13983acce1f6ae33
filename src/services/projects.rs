use std::sync::Arc;
use tracing::{debug, info, warn};

use super::ServiceError;
use crate::app::AppState;
use crate::database::models::Project;
use crate::database::repository::ProjectWrite;
use crate::database::{Database, DatabaseError, ProjectRepository};
use crate::images::{reconcile, EditOperation, ImageSlot};
use crate::media::{folders, upload_all, MediaStore, UploadedImage};
use crate::middleware::AuthUser;

pub struct ProjectService {
    db: Database,
    projects: ProjectRepository,
    media: Arc<dyn MediaStore>,
    max_images: usize,
}

impl ProjectService {
    pub fn new(db: Database, media: Arc<dyn MediaStore>, max_images: usize) -> Self {
        Self {
            projects: ProjectRepository::new(db.pool().clone()),
            db,
            media,
            max_images,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.db.clone(), state.media.clone(), state.config.api.max_images_per_field)
    }

    pub async fn create(
        &self,
        user: &AuthUser,
        title: Option<String>,
        images: Vec<UploadedImage>,
        write: ProjectWrite,
    ) -> Result<Project, ServiceError> {
        if images.is_empty() {
            return Err(ServiceError::validation("images", "At least one image file is required"));
        }
        if images.len() > self.max_images {
            return Err(ServiceError::validation(
                "images",
                format!("At most {} images are allowed", self.max_images),
            ));
        }
        let title = title.ok_or_else(|| ServiceError::validation("title", "Title is required"))?;

        let stored = upload_all(self.media.as_ref(), images, &folders::projects(&user.username)).await?;
        let urls: Vec<String> = stored.into_iter().map(|s| s.url).collect();

        Ok(self.projects.create(user.user_id, &title, &urls, write).await?)
    }

    /// Apply an edit to a project's image list and fields.
    ///
    /// Uploads happen before the transaction opens, planned against an
    /// unlocked read of the image list. The row is then locked; if its
    /// images changed in between, the edit is refused with 409 since the
    /// indices no longer point where the client meant. Only images that
    /// will end up in the list are uploaded.
    pub async fn update(
        &self,
        id: i32,
        user: &AuthUser,
        write: ProjectWrite,
        edit: EditOperation<UploadedImage>,
    ) -> Result<Project, ServiceError> {
        if edit.replacements.len() > self.max_images || edit.appended.len() > self.max_images {
            return Err(ServiceError::validation(
                "images",
                format!("At most {} images per field are allowed", self.max_images),
            ));
        }

        let snapshot = self
            .projects
            .owned_images(id, user.user_id)
            .await?
            .ok_or_else(not_found)?;

        let (plan, files) = edit.retain_effective(snapshot.len()).into_parts();
        debug!(
            "Project {} edit: {} removed, {} replaced, {} appended",
            id,
            plan.removed_indices.len(),
            plan.replacements.len(),
            plan.appended.len()
        );

        let stored = if files.is_empty() {
            Vec::new()
        } else {
            upload_all(self.media.as_ref(), files, &folders::projects(&user.username)).await?
        };
        let op: EditOperation<ImageSlot> = plan
            .fill(stored.into_iter().map(|s| ImageSlot::from(s.url)).collect())
            .ok_or_else(|| DatabaseError::QueryError("Upload count does not match edit plan".to_string()))?;

        let mut tx = self.db.begin().await?;

        let locked = ProjectRepository::lock_images(&mut tx, id, user.user_id)
            .await?
            .ok_or_else(not_found)?;
        ensure_unchanged(id, &snapshot, &locked)?;

        let current: Vec<ImageSlot> = locked.into_iter().map(ImageSlot::from).collect();
        let images: Vec<String> = reconcile(&current, &op).into_iter().map(ImageSlot::into_inner).collect();

        let project = ProjectRepository::write_edit(&mut tx, id, &images, &write).await?;
        tx.commit().await.map_err(DatabaseError::from)?;

        info!("Updated project {} ({} -> {} images)", id, current.len(), images.len());
        Ok(project)
    }
}

fn not_found() -> DatabaseError {
    DatabaseError::NotFound("Project not found or unauthorized".to_string())
}

/// The image list under the row lock must be the one the uploads were
/// planned against.
fn ensure_unchanged(id: i32, planned: &[String], locked: &[String]) -> Result<(), DatabaseError> {
    if planned == locked {
        return Ok(());
    }
    warn!("Project {} images changed while its edit was uploading", id);
    Err(DatabaseError::Conflict(
        "Project images were changed by another request; reload and try again".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn unchanged_image_list_passes() {
        assert!(ensure_unchanged(1, &urls(&["a", "b"]), &urls(&["a", "b"])).is_ok());
    }

    #[test]
    fn concurrent_image_change_is_a_conflict() {
        let err = ensure_unchanged(1, &urls(&["a", "b"]), &urls(&["a", "c"])).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));

        let err = ensure_unchanged(1, &urls(&["a", "b"]), &urls(&["a"])).unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
    }
}
