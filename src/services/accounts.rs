use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use super::ServiceError;
use crate::app::AppState;
use crate::auth::{hash_password, issue_token, validate, verify_password};
use crate::config::AppConfig;
use crate::database::models::UserProfile;
use crate::database::repository::{NewUser, ProfileUpdate};
use crate::database::{DatabaseError, UserRepository};
use crate::media::{folders, MediaStore, UploadedImage};

#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub summary: Option<String>,
    pub socials: Vec<String>,
}

/// A user plus a freshly issued token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: UserProfile,
    pub token: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    pub user: UserProfile,
    pub image_url: String,
}

pub struct AccountService {
    users: UserRepository,
    config: Arc<AppConfig>,
}

impl AccountService {
    pub fn new(users: UserRepository, config: Arc<AppConfig>) -> Self {
        Self { users, config }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(state.users(), state.config.clone())
    }

    fn check_password_length(&self, field: &'static str, password: &str) -> Result<(), ServiceError> {
        let min = self.config.security.min_password_length;
        if password.chars().count() < min {
            return Err(ServiceError::validation(
                field,
                format!("Password must be at least {} characters long", min),
            ));
        }
        Ok(())
    }

    /// Create an account. Used by registration and by the `cms create-user`
    /// command.
    pub async fn create_user(&self, input: RegisterInput) -> Result<UserProfile, ServiceError> {
        let username = input.username.trim().to_string();
        let email = input.email.trim().to_string();

        if !validate::is_valid_username(&username) {
            return Err(ServiceError::validation(
                "username",
                "Username must be 3-30 letters, digits, '_' or '-'",
            ));
        }
        if !validate::is_valid_email(&email) {
            return Err(ServiceError::validation("email", "Invalid email format"));
        }
        self.check_password_length("password", &input.password)?;

        if self.users.exists(&username, &email).await? {
            return Err(DatabaseError::Conflict("Username or email already exists".to_string()).into());
        }

        let user = self
            .users
            .create(NewUser {
                username,
                email,
                password_hash: hash_password(&input.password)?,
                name: input.name,
                summary: input.summary,
                socials: input.socials,
            })
            .await?;

        Ok(user.into())
    }

    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, ServiceError> {
        let user = self.create_user(input).await?;
        let token = issue_token(user.id, &user.username, &user.email, &self.config.security)?;
        Ok(AuthSession { user, token })
    }

    /// `login` is a username or an email address.
    pub async fn login(&self, login: &str, password: &str) -> Result<AuthSession, ServiceError> {
        let login = login.trim();
        if login.is_empty() || password.is_empty() {
            return Err(ServiceError::validation("username", "Username and password are required"));
        }

        let user = match self.users.find_by_login(login).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => return Err(ServiceError::Unauthorized("Invalid credentials")),
        };

        info!("User {} logged in", user.id);
        let token = issue_token(user.id, &user.username, &user.email, &self.config.security)?;
        Ok(AuthSession { user: user.into(), token })
    }

    pub async fn profile(&self, user_id: i32) -> Result<UserProfile, ServiceError> {
        Ok(self.users.find_404(user_id).await?.into())
    }

    pub async fn update_profile(&self, user_id: i32, mut update: ProfileUpdate) -> Result<UserProfile, ServiceError> {
        if let Some(email) = update.email.take() {
            let email = email.trim().to_string();
            if !validate::is_valid_email(&email) {
                return Err(ServiceError::validation("email", "Invalid email format"));
            }
            update.email = Some(email);
        }
        Ok(self.users.update_profile(user_id, update).await?.into())
    }

    pub async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        if current_password.is_empty() || new_password.is_empty() {
            return Err(ServiceError::validation(
                "newPassword",
                "Current password and new password are required",
            ));
        }
        self.check_password_length("newPassword", new_password)?;

        let user = self.users.find_404(user_id).await?;
        if !verify_password(current_password, &user.password_hash) {
            return Err(ServiceError::Unauthorized("Current password is incorrect"));
        }

        self.users.update_password(user_id, &hash_password(new_password)?).await?;
        info!("User {} changed password", user_id);
        Ok(())
    }

    /// Upload a new profile picture into the user's root media folder and
    /// store its path.
    pub async fn upload_profile_image(
        &self,
        media: &dyn MediaStore,
        user_id: i32,
        mut image: UploadedImage,
    ) -> Result<ProfileImage, ServiceError> {
        let max = self.config.api.max_profile_image_bytes;
        if image.size() > max {
            return Err(ServiceError::TooLarge(format!(
                "Profile image must be at most {} bytes",
                max
            )));
        }

        let user = self.users.find_404(user_id).await?;
        image.file_name = profile_file_name(&image.file_name, chrono::Utc::now().timestamp_millis());

        let stored = media.upload(image, &folders::profile(&user.username)).await?;
        let user = self.users.set_profile_image(user_id, &stored.file_path).await?;

        Ok(ProfileImage {
            user: user.into(),
            image_url: stored.url,
        })
    }
}

fn profile_file_name(original: &str, millis: i64) -> String {
    format!("profile_{}_{}", millis, original)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_file_name_is_timestamped() {
        assert_eq!(profile_file_name("me.png", 1700000000000), "profile_1700000000000_me.png");
    }
}
