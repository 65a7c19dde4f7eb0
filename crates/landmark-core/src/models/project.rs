use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::content::{ContentKind, ContentRecord, FormFields};
use super::{Document, StoredImageReference};
use crate::validation::normalize;

/// Portfolio project shown on the landing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Content address of the project image
    pub image: String,
    pub image_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of the project form
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct ProjectInput {
    #[validate(
        required(message = "Project name is required"),
        length(max = 100, message = "Project name cannot exceed 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Project description is required"),
        length(max = 1000, message = "Description cannot exceed 1000 characters")
    )]
    pub description: Option<String>,
}

impl Document for Project {
    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}

impl ContentRecord for Project {
    type Input = ProjectInput;

    const KIND: ContentKind = ContentKind::Project;

    fn input_from_form(fields: &FormFields) -> ProjectInput {
        ProjectInput {
            name: normalize(fields.get("name")),
            description: normalize(fields.get("description")),
        }
    }

    fn merged_input(&self, fields: &FormFields) -> ProjectInput {
        ProjectInput {
            name: normalize(fields.get("name")).or_else(|| Some(self.name.clone())),
            description: normalize(fields.get("description"))
                .or_else(|| Some(self.description.clone())),
        }
    }

    fn from_input(input: ProjectInput, image: StoredImageReference) -> Self {
        let now = Utc::now();
        Project {
            id: Uuid::new_v4(),
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            image: image.url,
            image_public_id: Some(image.public_id),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: ProjectInput, image: Option<StoredImageReference>) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(image) = image {
            self.image = image.url;
            self.image_public_id = Some(image.public_id);
        }
    }

    fn image(&self) -> &str {
        &self.image
    }

    fn set_image(&mut self, url: String) {
        self.image = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> StoredImageReference {
        StoredImageReference {
            url: "https://img.example/a.jpg".into(),
            public_id: "landmark/a".into(),
        }
    }

    #[test]
    fn blank_fields_fail_as_required() {
        let fields: FormFields = [("name", "   ")].into_iter().collect();
        let input = Project::input_from_form(&fields);
        let errors = input.validate().unwrap_err();
        let field_errors = errors.field_errors();
        assert!(field_errors.contains_key("name"));
        assert!(field_errors.contains_key("description"));
    }

    #[test]
    fn long_name_rejected() {
        let input = ProjectInput {
            name: Some("x".repeat(101)),
            description: Some("ok".into()),
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_trims_and_sets_image() {
        let fields: FormFields = [
            ("name", "  Lakeview Tower "),
            ("description", "A 12-story residential tower"),
        ]
        .into_iter()
        .collect();
        let input = Project::input_from_form(&fields);
        assert!(input.validate().is_ok());
        let project = Project::from_input(input, image());
        assert_eq!(project.name, "Lakeview Tower");
        assert_eq!(project.image, "https://img.example/a.jpg");
        assert_eq!(project.image_public_id.as_deref(), Some("landmark/a"));
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn merge_keeps_absent_fields() {
        let project = Project::from_input(
            ProjectInput {
                name: Some("Lakeview Tower".into()),
                description: Some("Original".into()),
            },
            image(),
        );
        let fields: FormFields = [("description", "Updated copy")].into_iter().collect();
        let mut updated = project.clone();
        updated.apply_input(project.merged_input(&fields), None);
        assert_eq!(updated.name, "Lakeview Tower");
        assert_eq!(updated.description, "Updated copy");
        assert_eq!(updated.image, project.image);
    }

    #[test]
    fn serializes_camel_case() {
        let project = Project::from_input(
            ProjectInput {
                name: Some("A".into()),
                description: Some("B".into()),
            },
            image(),
        );
        let json = serde_json::to_value(&project).unwrap();
        assert!(json.get("imagePublicId").is_some());
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn legacy_paths_resolve_against_local_base() {
        let mut project = Project::from_input(
            ProjectInput {
                name: Some("A".into()),
                description: Some("B".into()),
            },
            image(),
        );
        project.image = "/uploads/landmark/a.jpg".into();
        let resolved = project.with_resolved_image("http://localhost:5000/");
        assert_eq!(resolved.image, "http://localhost:5000/uploads/landmark/a.jpg");
    }
}
