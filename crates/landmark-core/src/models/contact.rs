use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Document;
use crate::validation::{normalize, normalize_email, EMAIL_PATTERN, MOBILE_PATTERN};

/// Contact-form submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub city: String,
    pub message: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Contact form body
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[validate(
        required(message = "Full name is required"),
        length(max = 100, message = "Full name cannot exceed 100 characters")
    )]
    pub full_name: Option<String>,
    #[validate(
        required(message = "Email is required"),
        regex(path = *EMAIL_PATTERN, message = "Please enter a valid email")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "Mobile number is required"),
        regex(path = *MOBILE_PATTERN, message = "Please enter a valid mobile number")
    )]
    pub mobile_number: Option<String>,
    #[validate(
        required(message = "City is required"),
        length(max = 50, message = "City name cannot exceed 50 characters")
    )]
    pub city: Option<String>,
    #[validate(length(max = 1000, message = "Message cannot exceed 1000 characters"))]
    pub message: Option<String>,
}

impl ContactInput {
    /// Trim every field, lower-case the email, and drop blanks.
    pub fn normalized(self) -> Self {
        ContactInput {
            full_name: normalize(self.full_name.as_deref()),
            email: normalize_email(self.email.as_deref()),
            mobile_number: normalize(self.mobile_number.as_deref()),
            city: normalize(self.city.as_deref()),
            message: normalize(self.message.as_deref()),
        }
    }
}

/// Response body of the unread-count endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub unread_count: i64,
}

impl Contact {
    /// Build from a normalized, validated input.
    pub fn from_input(input: ContactInput) -> Self {
        let now = Utc::now();
        Contact {
            id: Uuid::new_v4(),
            full_name: input.full_name.unwrap_or_default(),
            email: input.email.unwrap_or_default(),
            mobile_number: input.mobile_number.unwrap_or_default(),
            city: input.city.unwrap_or_default(),
            message: input.message,
            is_read: false,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Contact {
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

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ContactInput {
        ContactInput {
            full_name: Some(" Jane Doe ".into()),
            email: Some(" Jane@Example.com".into()),
            mobile_number: Some("9876543210".into()),
            city: Some("Pune".into()),
            message: Some("   ".into()),
        }
    }

    #[test]
    fn normalizes_before_validation() {
        let input = valid().normalized();
        assert!(input.validate().is_ok());
        assert_eq!(input.email.as_deref(), Some("jane@example.com"));
        assert_eq!(input.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(input.message, None);

        let contact = Contact::from_input(input);
        assert!(!contact.is_read);
        assert_eq!(contact.city, "Pune");
    }

    #[test]
    fn bad_email_and_mobile_reported_per_field() {
        let input = ContactInput {
            email: Some("not-an-email".into()),
            mobile_number: Some("12345".into()),
            ..valid()
        }
        .normalized();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("mobile_number"));
        assert!(!fields.contains_key("city"));
    }

    #[test]
    fn city_limited_to_50() {
        let input = ContactInput {
            city: Some("c".repeat(51)),
            ..valid()
        }
        .normalized();
        assert!(input.validate().is_err());
    }
}
