use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One historical username change. Chains of these keep old profile URLs alive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameRecord {
    pub old_username: String,
    pub new_username: String,
}

impl RenameRecord {
    pub fn new(old_username: impl Into<String>, new_username: impl Into<String>) -> Self {
        Self {
            old_username: old_username.into(),
            new_username: new_username.into(),
        }
    }
}

/// A user's public card. `id` is the owner key issued by the auth provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub profile_image_url: Option<String>,
    pub banner_image_url: Option<String>,
    pub theme: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Empty profile for a principal that has never saved one.
    pub fn blank(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: None,
            full_name: None,
            company: None,
            about: None,
            phone: None,
            email: None,
            website: None,
            profile_image_url: None,
            banner_image_url: None,
            theme: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A social link on a card. Display order is `order_index` ascending;
/// values may have gaps and are never renumbered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub platform: String,
    pub target_url: String,
    pub order_index: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}
