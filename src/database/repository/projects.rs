use sqlx::{PgConnection, PgPool};
use tracing::info;

use super::{insert_category_links, replace_category_links};
use crate::database::manager::DatabaseError;
use crate::database::models::Project;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{FilterSpec, FilterTarget, Paginated, Pagination, RequestField};

/// Project fields taken from a create or update form. On update `None`
/// keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProjectWrite {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_ids: RequestField<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn builder() -> QueryBuilder<Project> {
        QueryBuilder::new(FilterTarget::Projects)
    }

    pub async fn list(&self, spec: &FilterSpec, pagination: Pagination) -> Result<Paginated<Project>, DatabaseError> {
        Self::builder().select_page(&self.pool, spec, pagination).await
    }

    pub async fn find_404(&self, id: i32) -> Result<Project, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::builder().select_404(&mut conn, id).await
    }

    pub async fn create(
        &self,
        user_id: i32,
        title: &str,
        images: &[String],
        write: ProjectWrite,
    ) -> Result<Project, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO projects (batch_image_path, title, description, user_id)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(images)
        .bind(title)
        .bind(&write.description)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if let RequestField::Present(ids) = &write.category_ids {
            insert_category_links(&mut tx, "project_categories", "project_id", id, ids).await?;
        }

        let project = Self::builder().select_404(&mut tx, id).await?;
        tx.commit().await?;

        info!("Created project {} with {} images for user {}", id, images.len(), user_id);
        Ok(project)
    }

    /// Image list of a project the caller owns, read without locking.
    pub async fn owned_images(&self, id: i32, user_id: i32) -> Result<Option<Vec<String>>, DatabaseError> {
        let images: Option<Vec<String>> =
            sqlx::query_scalar("SELECT batch_image_path FROM projects WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(images)
    }

    /// Lock the project row for the rest of the transaction and return its
    /// image list. `None` when the project does not exist or belongs to
    /// someone else.
    pub async fn lock_images(
        conn: &mut PgConnection,
        id: i32,
        user_id: i32,
    ) -> Result<Option<Vec<String>>, DatabaseError> {
        let images: Option<Vec<String>> = sqlx::query_scalar(
            "SELECT batch_image_path FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(images)
    }

    /// Write an edited project back inside the transaction that locked it,
    /// then re-read it with its categories.
    pub async fn write_edit(
        conn: &mut PgConnection,
        id: i32,
        images: &[String],
        write: &ProjectWrite,
    ) -> Result<Project, DatabaseError> {
        sqlx::query(
            "UPDATE projects
             SET title = COALESCE($2, title),
                 description = COALESCE($3, description),
                 batch_image_path = $4,
                 updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&write.title)
        .bind(&write.description)
        .bind(images)
        .execute(&mut *conn)
        .await?;

        if let RequestField::Present(ids) = &write.category_ids {
            replace_category_links(conn, "project_categories", "project_id", id, ids).await?;
        }

        Self::builder().select_404(conn, id).await
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Project not found or unauthorized".to_string()));
        }
        info!("Deleted project {}", id);
        Ok(())
    }
}
