use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{resolve_image_url, Document, StoredImageReference};

/// The two image-backed record types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Project,
    Client,
}

impl ContentKind {
    /// Human label used in response messages ("Project not found").
    pub fn label(&self) -> &'static str {
        match self {
            ContentKind::Project => "Project",
            ContentKind::Client => "Client",
        }
    }

    /// Multipart field carrying the image.
    pub fn file_field(&self) -> &'static str {
        match self {
            ContentKind::Project => "projectImage",
            ContentKind::Client => "clientImage",
        }
    }

    /// Route segment under `/api`.
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Project => "projects",
            ContentKind::Client => "clients",
        }
    }

    /// Whether `name` is a file part this kind accepts.
    pub fn accepts_file_field(&self, name: &str) -> bool {
        name == self.file_field() || name == "image"
    }

    pub fn not_found(&self) -> String {
        format!("{} not found", self.label())
    }

    pub fn image_required(&self) -> String {
        format!("{} image is required", self.label())
    }
}

/// Text parts of a multipart submission, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = FormFields::new();
        for (k, v) in iter {
            fields.insert(k, v);
        }
        fields
    }
}

/// A record whose image travels through the upload pipeline.
///
/// `Input` is the validated text schema. On create it is built from the form
/// alone; on update the submitted fields are merged over the stored record so
/// that absent fields keep their current values.
pub trait ContentRecord: Document {
    type Input: Validate + Send + 'static;

    const KIND: ContentKind;

    fn input_from_form(fields: &FormFields) -> Self::Input;

    fn merged_input(&self, fields: &FormFields) -> Self::Input;

    /// Build a new record from an input that passed validation.
    fn from_input(input: Self::Input, image: StoredImageReference) -> Self;

    /// Apply an input that passed validation; `image` replaces the stored
    /// reference only when present.
    fn apply_input(&mut self, input: Self::Input, image: Option<StoredImageReference>);

    fn image(&self) -> &str;

    fn set_image(&mut self, url: String);

    /// Turn a legacy relative image path into a loadable URL.
    fn with_resolved_image(mut self, local_base_url: &str) -> Self {
        let url = resolve_image_url(self.image(), local_base_url);
        self.set_image(url);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_name_their_fields() {
        assert_eq!(ContentKind::Project.file_field(), "projectImage");
        assert_eq!(ContentKind::Client.file_field(), "clientImage");
        assert!(ContentKind::Client.accepts_file_field("image"));
        assert!(!ContentKind::Client.accepts_file_field("projectImage"));
        assert_eq!(ContentKind::Project.not_found(), "Project not found");
        assert_eq!(ContentKind::Client.image_required(), "Client image is required");
    }

    #[test]
    fn form_fields_collect() {
        let fields: FormFields = [("name", "Lakeview Tower")].into_iter().collect();
        assert_eq!(fields.get("name"), Some("Lakeview Tower"));
        assert_eq!(fields.get("description"), None);
        assert_eq!(fields.len(), 1);
    }
}
