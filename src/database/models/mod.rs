pub mod artwork;
pub mod category;
pub mod project;
pub mod user;

pub use artwork::Artwork;
pub use category::{Category, CategoryLink};
pub use project::Project;
pub use user::{PublicProfile, User, UserProfile};
