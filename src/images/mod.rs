//! Batch image list editing for projects.

pub mod edit;
pub mod reconcile;

pub use edit::ImageEditForm;
pub use reconcile::{reconcile, EditOperation, ImageSlot};
