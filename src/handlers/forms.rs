// handlers/forms.rs - multipart form parsing shared by the artwork, project
// and profile image handlers

use axum::extract::Multipart;
use std::collections::HashMap;
use std::str::FromStr;

use crate::database::repository::{ArtworkWrite, ProjectWrite};
use crate::error::ApiError;
use crate::filter::{ArtworkType, RequestField};
use crate::images::{EditOperation, ImageEditForm};
use crate::media::UploadedImage;

/// A multipart body read fully into memory: text values and image files,
/// each grouped by field name in arrival order.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<UploadedImage>>,
}

impl MultipartForm {
    /// Read every part. A part with a file name is a file and must be an
    /// image; more than `max_files_per_field` files under one name is a 400.
    pub async fn read(mut multipart: Multipart, max_files_per_field: usize) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field.bytes().await?;
                    let image = UploadedImage::new(file_name, content_type, bytes.to_vec())?;

                    let files = form.files.entry(name.clone()).or_default();
                    if files.len() >= max_files_per_field {
                        return Err(ApiError::field(
                            "images",
                            format!("At most {} files are allowed for '{}'", max_files_per_field, name),
                        ));
                    }
                    files.push(image);
                }
                None => {
                    let value = field.text().await?;
                    form.fields.entry(name).or_default().push(value);
                }
            }
        }

        Ok(form)
    }

    /// First value of a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(|values| values.first()).map(String::as_str)
    }

    pub fn text_all(&self, name: &str) -> &[String] {
        self.fields.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trimmed first value, `None` when missing or blank.
    pub fn non_blank(&self, name: &str) -> Option<String> {
        self.text(name)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    pub fn take_files(&mut self, name: &str) -> Vec<UploadedImage> {
        self.files.remove(name).unwrap_or_default()
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedImage> {
        self.take_files(name).into_iter().next()
    }

    pub fn category_ids(&self) -> RequestField<Vec<i64>> {
        RequestField::parse_id_list(self.text("categoryIds"))
    }

    /// `type` is optional, but a value other than portfolio or scratch is
    /// rejected on writes.
    pub fn artwork_type(&self) -> Result<Option<ArtworkType>, ApiError> {
        match self.non_blank("type") {
            None => Ok(None),
            Some(raw) => ArtworkType::from_str(&raw)
                .map(Some)
                .map_err(|_| ApiError::field("type", r#"Type must be either "portfolio" or "scratch""#)),
        }
    }

    pub fn artwork_write(&self) -> Result<ArtworkWrite, ApiError> {
        Ok(ArtworkWrite {
            title: self.non_blank("title"),
            description: self.non_blank("description"),
            artwork_type: self.artwork_type()?,
            category_ids: self.category_ids(),
        })
    }

    pub fn project_write(&self) -> ProjectWrite {
        ProjectWrite {
            title: self.non_blank("title"),
            description: self.non_blank("description"),
            category_ids: self.category_ids(),
        }
    }

    /// Image edit plan of a project update. Takes the `modifiedImages` and
    /// `addedImages` files out of the form.
    pub fn take_image_edit(&mut self) -> EditOperation<UploadedImage> {
        let mut edit = ImageEditForm {
            removed_indices: RequestField::parse_id_list(self.text("removedImageIndices")),
            ..ImageEditForm::default()
        };
        for raw in self.text_all("modifiedImageIndices").to_vec() {
            edit.push_modified_index(&raw);
        }
        edit.modified_images = self.take_files("modifiedImages");
        edit.added_images = self.take_files("addedImages");
        edit.into_operation()
    }
}

#[cfg(test)]
impl MultipartForm {
    pub fn insert_text(&mut self, name: &str, value: impl Into<String>) {
        self.fields.entry(name.to_string()).or_default().push(value.into());
    }

    pub fn insert_file(&mut self, name: &str, image: UploadedImage) {
        self.files.entry(name.to_string()).or_default().push(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(name: &str) -> UploadedImage {
        UploadedImage::new(name, "image/png", vec![0x89, b'P', b'N', b'G']).unwrap()
    }

    #[test]
    fn blank_text_reads_as_missing() {
        let mut form = MultipartForm::default();
        form.insert_text("title", "   ");
        form.insert_text("description", " Sunset ");
        assert_eq!(form.non_blank("title"), None);
        assert_eq!(form.non_blank("description").as_deref(), Some("Sunset"));
    }

    #[test]
    fn artwork_type_rejects_unknown_values() {
        let mut form = MultipartForm::default();
        form.insert_text("type", "sketch");
        let err = form.artwork_write().unwrap_err();
        assert_eq!(err.status_code(), 400);

        let mut form = MultipartForm::default();
        form.insert_text("type", "scratch");
        assert_eq!(form.artwork_write().unwrap().artwork_type, Some(ArtworkType::Scratch));

        assert_eq!(MultipartForm::default().artwork_write().unwrap().artwork_type, None);
    }

    #[test]
    fn category_ids_follow_request_field_rules() {
        let mut form = MultipartForm::default();
        assert!(form.category_ids().is_absent());
        form.insert_text("categoryIds", "[1, 2]");
        assert_eq!(form.category_ids(), RequestField::Present(vec![1, 2]));
    }

    #[test]
    fn image_edit_pairs_repeated_indices_with_files() {
        let mut form = MultipartForm::default();
        form.insert_text("removedImageIndices", "[0]");
        form.insert_text("modifiedImageIndices", "2");
        form.insert_text("modifiedImageIndices", "1");
        form.insert_file("modifiedImages", png("two.png"));
        form.insert_file("modifiedImages", png("one.png"));
        form.insert_file("addedImages", png("new.png"));

        let edit = form.take_image_edit();
        let replaced: Vec<_> = edit
            .replacements
            .iter()
            .map(|(i, f)| (*i, f.file_name.as_str()))
            .collect();
        assert_eq!(replaced, vec![(2, "two.png"), (1, "one.png")]);
        assert_eq!(edit.appended.len(), 1);
        assert!(edit.removed_indices.contains(&0));
        assert!(form.take_files("addedImages").is_empty());
    }

    #[test]
    fn image_edit_accepts_json_index_list() {
        let mut form = MultipartForm::default();
        form.insert_text("modifiedImageIndices", "[3, 4]");
        form.insert_file("modifiedImages", png("a.png"));
        form.insert_file("modifiedImages", png("b.png"));

        let edit = form.take_image_edit();
        let indices: Vec<i64> = edit.replacements.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![3, 4]);
    }
}
