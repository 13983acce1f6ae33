use sqlx::PgPool;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{PublicProfile, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, name, summary, socials, \
                            profile_image_path, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Vec<String>,
}

/// Profile fields a user may change. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn find_404(&self, id: i32) -> Result<User, DatabaseError> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }

    /// Look up by username or email; login accepts either.
    pub async fn find_by_login(&self, login: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM users WHERE username = $1 OR LOWER(email) = LOWER($1) LIMIT 1",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn public_profile(&self, id: i32) -> Result<Option<PublicProfile>, DatabaseError> {
        let profile = sqlx::query_as::<_, PublicProfile>(
            "SELECT id, username, name, summary, socials, profile_image_path, created_at, updated_at
             FROM users
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn exists(&self, username: &str, email: &str) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 OR LOWER(email) = LOWER($2))",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, name, summary, socials)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.name)
            .bind(&new_user.summary)
            .bind(&new_user.socials)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(user) => {
                info!("Created user {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(e) => Err(unique_as_conflict(e.into(), "Username or email already exists")),
        }
    }

    pub async fn update_profile(&self, id: i32, update: ProfileUpdate) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users
             SET email = COALESCE($2, email),
                 name = COALESCE($3, name),
                 summary = COALESCE($4, summary),
                 socials = COALESCE($5, socials),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );
        let result = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&update.email)
            .bind(&update.name)
            .bind(&update.summary)
            .bind(&update.socials)
            .fetch_optional(&self.pool)
            .await;

        match result {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(DatabaseError::NotFound("User not found".to_string())),
            Err(e) => Err(unique_as_conflict(e.into(), "Email already in use")),
        }
    }

    pub async fn update_password(&self, id: i32, password_hash: &str) -> Result<(), DatabaseError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    pub async fn set_profile_image(&self, id: i32, path: &str) -> Result<User, DatabaseError> {
        let sql = format!(
            "UPDATE users SET profile_image_path = $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(path)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::NotFound("User not found".to_string()))
    }
}

fn unique_as_conflict(err: DatabaseError, message: &str) -> DatabaseError {
    if err.is_unique_violation() {
        DatabaseError::Conflict(message.to_string())
    } else {
        err
    }
}
