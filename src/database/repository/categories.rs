use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::Category;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_by_user(&self, user_id: i32) -> Result<Vec<Category>, DatabaseError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn create(&self, user_id: i32, name: &str) -> Result<Category, DatabaseError> {
        let row = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, user_id) VALUES ($1, $2) RETURNING *",
        )
        .bind(name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Rename a category owned by `user_id`. Someone else's category reads as
    /// missing.
    pub async fn rename(&self, id: i32, user_id: i32, name: &str) -> Result<Category, DatabaseError> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET name = $2, updated_at = NOW()
             WHERE id = $1 AND user_id = $3
             RETURNING *",
        )
        .bind(id)
        .bind(name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DatabaseError::NotFound("Category not found or unauthorized".to_string()))
    }

    pub async fn delete(&self, id: i32, user_id: i32) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("Category not found or unauthorized".to_string()));
        }
        Ok(())
    }
}
