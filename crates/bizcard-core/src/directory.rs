use async_trait::async_trait;
use uuid::Uuid;

use bizcard_types::models::{Profile, RenameRecord, SocialLink};

use crate::error::DirectoryError;

/// Partial update of a social link. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub platform: Option<String>,
    pub target_url: Option<String>,
    pub order_index: Option<i64>,
}

impl LinkPatch {
    pub fn order(order_index: i64) -> Self {
        Self {
            order_index: Some(order_index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.target_url.is_none() && self.order_index.is_none()
    }

    pub fn apply(&self, link: &mut SocialLink) {
        if let Some(platform) = &self.platform {
            link.platform = platform.clone();
        }
        if let Some(target_url) = &self.target_url {
            link.target_url = target_url.clone();
        }
        if let Some(order_index) = self.order_index {
            link.order_index = order_index;
        }
    }
}

/// The external record store. Every call is a round trip; callers must treat
/// anything read as possibly stale by the time they write.
#[async_trait]
pub trait Directory: Send + Sync {
    // -- Rename records --

    async fn find_rename(&self, old_username: &str) -> Result<Option<RenameRecord>, DirectoryError>;

    /// Insert or replace the record keyed on `record.old_username`.
    async fn put_rename(&self, record: &RenameRecord) -> Result<(), DirectoryError>;

    /// Removing a key that has no record is not an error.
    async fn delete_rename(&self, old_username: &str) -> Result<(), DirectoryError>;

    // -- Profiles --

    async fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, DirectoryError>;

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, DirectoryError>;

    /// Fails with `Conflict` when the id or username is already taken.
    async fn insert_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError>;

    /// Fails with `NotFound` for an unknown id, `Conflict` for a taken username.
    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError>;

    // -- Social links --

    /// Links of one owner, by `order_index` then insertion.
    async fn list_links(&self, owner_id: Uuid) -> Result<Vec<SocialLink>, DirectoryError>;

    async fn count_links(&self, owner_id: Uuid) -> Result<i64, DirectoryError>;

    async fn find_link(&self, id: Uuid) -> Result<Option<SocialLink>, DirectoryError>;

    async fn insert_link(&self, link: &SocialLink) -> Result<SocialLink, DirectoryError>;

    async fn update_link(&self, id: Uuid, patch: &LinkPatch) -> Result<SocialLink, DirectoryError>;

    async fn delete_link(&self, id: Uuid) -> Result<(), DirectoryError>;
}
