use sqlx::PgPool;
use tracing::info;

use super::{insert_category_links, replace_category_links};
use crate::database::manager::DatabaseError;
use crate::database::models::Artwork;
use crate::database::query_builder::QueryBuilder;
use crate::filter::{ArtworkType, FilterSpec, FilterTarget, Paginated, Pagination, RequestField};

/// Artwork fields taken from a create or update form. On update `None`
/// keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ArtworkWrite {
    pub title: Option<String>,
    pub description: Option<String>,
    pub artwork_type: Option<ArtworkType>,
    pub category_ids: RequestField<Vec<i64>>,
}

#[derive(Debug, Clone)]
pub struct ArtworkRepository {
    pool: PgPool,
}

impl ArtworkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn builder() -> QueryBuilder<Artwork> {
        QueryBuilder::new(FilterTarget::Artworks)
    }

    pub async fn list(&self, spec: &FilterSpec, pagination: Pagination) -> Result<Paginated<Artwork>, DatabaseError> {
        Self::builder().select_page(&self.pool, spec, pagination).await
    }

    pub async fn find_404(&self, id: i32) -> Result<Artwork, DatabaseError> {
        let mut conn = self.pool.acquire().await?;
        Self::builder().select_404(&mut conn, id).await
    }

    pub async fn create(&self, user_id: i32, image_path: &str, write: ArtworkWrite) -> Result<Artwork, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            "INSERT INTO artworks (image_path, title, description, type, user_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(image_path)
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.artwork_type.unwrap_or_default().as_str())
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if let RequestField::Present(ids) = &write.category_ids {
            insert_category_links(&mut tx, "artwork_categories", "artwork_id", id, ids).await?;
        }

        let artwork = Self::builder().select_404(&mut tx, id).await?;
        tx.commit().await?;

        info!("Created artwork {} for user {}", id, user_id);
        Ok(artwork)
    }

    /// Update an artwork owned by `user_id`. Category links are replaced only
    /// when the form carried a usable `categoryIds` list.
    pub async fn update(
        &self,
        id: i32,
        user_id: i32,
        image_path: Option<&str>,
        write: ArtworkWrite,
    ) -> Result<Artwork, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        let updated: Option<i32> = sqlx::query_scalar(
            "UPDATE artworks
             SET title = COALESCE($3, title),
                 description = COALESCE($4, description),
                 type = COALESCE($5, type),
                 image_path = COALESCE($6, image_path),
                 updated_at = NOW()
             WHERE id = $1 AND user_id = $2
             RETURNING id",
        )
        .bind(id)
        .bind(user_id)
        .bind(&write.title)
        .bind(&write.description)
        .bind(write.artwork_type.map(|t| t.as_str()))
        .bind(image_path)
        .fetch_optional(&mut *tx)
        .await?;

        if updated.is_none() {
            return Err(not_found_or_unauthorized());
        }

        if let RequestField::Present(ids) = &write.category_ids {
            replace_category_links(&mut tx, "artwork_categories", "artwork_id", id, ids).await?;
        }

        let artwork = Self::builder().select_404(&mut tx, id).await?;
        tx.commit().await?;
        Ok(artwork)
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM artworks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(not_found_or_unauthorized());
        }
        info!("Deleted artwork {}", id);
        Ok(())
    }
}

fn not_found_or_unauthorized() -> DatabaseError {
    DatabaseError::NotFound("Artwork not found or unauthorized".to_string())
}
