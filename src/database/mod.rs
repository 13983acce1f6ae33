pub mod manager;
pub mod models;
pub mod query_builder;
pub mod repository;

pub use manager::{Database, DatabaseError};
pub use repository::{ArtworkRepository, CategoryRepository, ProjectRepository, UserRepository};
