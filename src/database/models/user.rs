use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<Vec<String>>,
    pub profile_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<Vec<String>>,
    pub profile_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile as shown to anyone; no email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicProfile {
    pub id: i32,
    pub username: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<Vec<String>>,
    pub profile_image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            name: user.name,
            summary: user.summary,
            socials: user.socials,
            profile_image_path: user.profile_image_path,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
