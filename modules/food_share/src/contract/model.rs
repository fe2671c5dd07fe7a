use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Users & sessions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Donor,
    Volunteer,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Donor => "donor",
            Role::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "donor" => Ok(Role::Donor),
            "volunteer" => Ok(Role::Volunteer),
            other => Err(format!("unknown role '{other}' (expected donor or volunteer)")),
        }
    }
}

/// Running totals a volunteer accumulates by claiming food.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_claims: u32,
    /// Kilograms of food rescued.
    pub total_food_saved: f64,
    /// Ids of earned badges, in the order they were earned.
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub stats: UserStats,
}

impl User {
    /// Build a session user without any verification.
    ///
    /// The id is derived from the lower-cased email so the same person gets
    /// the same id across sessions.
    pub fn fabricate(name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        let email = email.into();
        Self {
            id: Self::id_for_email(&email),
            name: name.into(),
            email,
            role,
            stats: UserStats::default(),
        }
    }

    pub fn id_for_email(email: &str) -> Uuid {
        let key = format!("mailto:{}", email.trim().to_lowercase());
        Uuid::new_v5(&Uuid::NAMESPACE_URL, key.as_bytes())
    }
}

/// Login form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Signup form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Food posts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Available,
    Claimed,
    Expired,
}

impl PostStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            PostStatus::Available => "available",
            PostStatus::Claimed => "claimed",
            PostStatus::Expired => "expired",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(PostStatus::Available),
            "claimed" => Ok(PostStatus::Claimed),
            "expired" => Ok(PostStatus::Expired),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// A donation listing. Serialized with camelCase names, matching the stored
/// document layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPost {
    pub id: Uuid,
    pub donor_id: Uuid,
    pub donor_name: String,
    pub food_name: String,
    pub quantity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kilograms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_weight: Option<f64>,
    /// `YYYY-MM-DD`
    pub pickup_date: String,
    /// `HH:MM`
    pub pickup_time: String,
    pub contact_number: String,
    pub address: String,
    pub location: GeoPoint,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    pub status: PostStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Donation form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewFoodPost {
    pub food_name: String,
    pub quantity: String,
    pub pickup_date: String,
    pub pickup_time: String,
    pub contact_number: String,
    pub address: String,
    pub estimated_weight: Option<f64>,
    pub description: Option<String>,
    /// Falls back to the configured map centre when absent.
    pub location: Option<GeoPoint>,
    pub photos: Vec<String>,
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    NewPost,
    PostClaimed,
    BadgeEarned,
}

impl NotificationKind {
    /// Icon shown next to the toast for this kind.
    pub const fn icon(self) -> &'static str {
        match self {
            NotificationKind::NewPost => "🍽️",
            NotificationKind::PostClaimed => "🤝",
            NotificationKind::BadgeEarned => "🏆",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    /// Recipient: a user id, or an audience such as `volunteers`.
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Notification payload before the store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub post_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Badges
// ---------------------------------------------------------------------------

/// Which running total a badge is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeMetric {
    Claims,
    FoodSavedKg,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: u32,
    pub metric: BadgeMetric,
}
