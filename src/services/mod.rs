//! Operations that span more than one collaborator (database, media host,
//! token issuing). Handlers parse requests and call into these.

pub mod accounts;
pub mod artworks;
pub mod projects;

pub use accounts::{AccountService, AuthSession, ProfileImage, RegisterInput};
pub use artworks::ArtworkService;
pub use projects::ProjectService;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;
use crate::error::ApiError;
use crate::media::MediaError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    TooLarge(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation { field, message } => ApiError::field(field, message),
            ServiceError::Unauthorized(msg) => ApiError::unauthorized(msg),
            ServiceError::TooLarge(msg) => ApiError::payload_too_large(msg),
            ServiceError::Database(e) => e.into(),
            ServiceError::Media(e) => e.into(),
            ServiceError::Auth(e) => e.into(),
        }
    }
}
