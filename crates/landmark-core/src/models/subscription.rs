use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::Document;
use crate::validation::{normalize_email, EMAIL_PATTERN};

/// Newsletter subscription. One record per email; unsubscribing flips
/// `is_active` rather than deleting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    pub subscribed_at: DateTime<Utc>,
    pub unsubscribed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subscribe / unsubscribe body
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, Validate)]
pub struct SubscriptionInput {
    #[validate(
        required(message = "Email is required"),
        regex(path = *EMAIL_PATTERN, message = "Please enter a valid email")
    )]
    pub email: Option<String>,
}

impl SubscriptionInput {
    pub fn normalized(self) -> Self {
        SubscriptionInput {
            email: normalize_email(self.email.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStats {
    pub total_subscriptions: i64,
    pub total_unsubscribed: i64,
    /// Active subscriptions created in the last 30 days
    pub recent_subscriptions: i64,
}

impl Subscription {
    pub fn new(email: String) -> Self {
        let now = Utc::now();
        Subscription {
            id: Uuid::new_v4(),
            email,
            is_active: true,
            subscribed_at: now,
            unsubscribed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bring an unsubscribed record back; the identifier is kept.
    pub fn reactivate(&mut self, now: DateTime<Utc>) {
        self.is_active = true;
        self.subscribed_at = now;
        self.unsubscribed_at = None;
    }

    pub fn unsubscribe(&mut self, now: DateTime<Utc>) {
        self.is_active = false;
        self.unsubscribed_at = Some(now);
    }
}

impl Document for Subscription {
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
