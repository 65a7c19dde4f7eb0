use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::content::{ContentKind, ContentRecord, FormFields};
use super::{Document, StoredImageReference};
use crate::validation::normalize;

/// Client testimonial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub designation: String,
    pub image: String,
    pub image_public_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Text fields of the client form
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct ClientInput {
    #[validate(
        required(message = "Client name is required"),
        length(max = 100, message = "Client name cannot exceed 100 characters")
    )]
    pub name: Option<String>,
    #[validate(
        required(message = "Client description is required"),
        length(max = 500, message = "Description cannot exceed 500 characters")
    )]
    pub description: Option<String>,
    #[validate(
        required(message = "Client designation is required"),
        length(max = 100, message = "Designation cannot exceed 100 characters")
    )]
    pub designation: Option<String>,
}

impl Document for Client {
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

impl ContentRecord for Client {
    type Input = ClientInput;

    const KIND: ContentKind = ContentKind::Client;

    fn input_from_form(fields: &FormFields) -> ClientInput {
        ClientInput {
            name: normalize(fields.get("name")),
            description: normalize(fields.get("description")),
            designation: normalize(fields.get("designation")),
        }
    }

    fn merged_input(&self, fields: &FormFields) -> ClientInput {
        ClientInput {
            name: normalize(fields.get("name")).or_else(|| Some(self.name.clone())),
            description: normalize(fields.get("description"))
                .or_else(|| Some(self.description.clone())),
            designation: normalize(fields.get("designation"))
                .or_else(|| Some(self.designation.clone())),
        }
    }

    fn from_input(input: ClientInput, image: StoredImageReference) -> Self {
        let now = Utc::now();
        Client {
            id: Uuid::new_v4(),
            name: input.name.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
            designation: input.designation.unwrap_or_default(),
            image: image.url,
            image_public_id: Some(image.public_id),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_input(&mut self, input: ClientInput, image: Option<StoredImageReference>) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if let Some(description) = input.description {
            self.description = description;
        }
        if let Some(designation) = input.designation {
            self.designation = designation;
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
