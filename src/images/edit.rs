use crate::filter::RequestField;

use super::reconcile::EditOperation;

/// Image-related fields of a project edit form, before any upload.
///
/// `modified_indices[i]` pairs with `modified_images[i]`. One unparseable
/// index value makes the whole pairing unreliable, so `modified_invalid`
/// then drops every replacement.
#[derive(Debug, Clone)]
pub struct ImageEditForm<F> {
    pub removed_indices: RequestField<Vec<i64>>,
    pub modified_indices: Vec<i64>,
    pub modified_invalid: bool,
    pub modified_images: Vec<F>,
    pub added_images: Vec<F>,
}

impl<F> Default for ImageEditForm<F> {
    fn default() -> Self {
        Self {
            removed_indices: RequestField::Absent,
            modified_indices: Vec::new(),
            modified_invalid: false,
            modified_images: Vec::new(),
            added_images: Vec::new(),
        }
    }
}

impl<F> ImageEditForm<F> {
    /// Record one `modifiedImageIndices` form value. Accepts a single integer
    /// or a JSON list of integers.
    pub fn push_modified_index(&mut self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.starts_with('[') {
            match RequestField::parse_id_list(Some(trimmed)) {
                RequestField::Present(ids) => self.modified_indices.extend(ids),
                _ => self.mark_modified_invalid(trimmed),
            }
        } else {
            match trimmed.parse::<i64>() {
                Ok(index) => self.modified_indices.push(index),
                Err(_) => self.mark_modified_invalid(trimmed),
            }
        }
    }

    fn mark_modified_invalid(&mut self, raw: &str) {
        tracing::warn!("Malformed modifiedImageIndices value {:?}; ignoring all replacements", raw);
        self.modified_invalid = true;
    }

    /// Pair files with indices and build the edit plan. Unpaired files or
    /// indices are dropped, as are malformed removal lists and, after any
    /// malformed modified index, all replacements.
    pub fn into_operation(self) -> EditOperation<F> {
        let removed_indices = match self.removed_indices {
            RequestField::Present(ids) => ids.into_iter().collect(),
            RequestField::Invalid(raw) => {
                tracing::warn!("Ignoring malformed removedImageIndices: {}", raw);
                Default::default()
            }
            RequestField::Absent => Default::default(),
        };

        let replacements = if self.modified_invalid {
            Vec::new()
        } else {
            self.modified_indices.into_iter().zip(self.modified_images).collect()
        };

        EditOperation {
            removed_indices,
            replacements,
            appended: self.added_images,
        }
    }
}
