use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use bizcard_types::models::{Profile, RenameRecord, SocialLink};

use crate::directory::{Directory, LinkPatch};
use crate::error::DirectoryError;

#[derive(Default)]
struct State {
    renames: HashMap<String, String>,
    profiles: Vec<Profile>,
    /// Insertion order is preserved; it is the tiebreak for equal indices.
    links: Vec<SocialLink>,
    offline: bool,
    failing_rename_lookups: usize,
    link_updates_before_failure: Option<usize>,
}

/// Directory kept in process memory.
///
/// Each call yields to the scheduler once before touching state, so
/// concurrently polled operations interleave the way remote round trips do.
/// The `fail_*` knobs inject backend outages.
#[derive(Clone, Default)]
pub struct MemoryDirectory {
    state: Arc<RwLock<State>>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `Unavailable` while offline.
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    /// The next `count` rename lookups fail with `Unavailable`.
    pub fn fail_next_rename_lookups(&self, count: usize) {
        self.state.write().failing_rename_lookups = count;
    }

    /// Allow `successes` more link updates, then fail every later one.
    pub fn fail_link_updates_after(&self, successes: usize) {
        self.state.write().link_updates_before_failure = Some(successes);
    }

    pub fn link(&self, id: Uuid) -> Option<SocialLink> {
        self.state.read().links.iter().find(|l| l.id == id).cloned()
    }

    pub fn rename_count(&self) -> usize {
        self.state.read().renames.len()
    }

    async fn enter(&self) -> Result<(), DirectoryError> {
        tokio::task::yield_now().await;
        if self.state.read().offline {
            return Err(DirectoryError::Unavailable("directory offline".into()));
        }
        Ok(())
    }
}

fn username_taken(state: &State, profile: &Profile) -> bool {
    profile.username.as_ref().is_some_and(|name| {
        state
            .profiles
            .iter()
            .any(|p| p.id != profile.id && p.username.as_ref() == Some(name))
    })
}

#[async_trait]
impl Directory for MemoryDirectory {
    async fn find_rename(&self, old_username: &str) -> Result<Option<RenameRecord>, DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if state.failing_rename_lookups > 0 {
            state.failing_rename_lookups -= 1;
            return Err(DirectoryError::Unavailable("rename lookup failed".into()));
        }
        Ok(state
            .renames
            .get(old_username)
            .map(|new| RenameRecord::new(old_username, new.clone())))
    }

    async fn put_rename(&self, record: &RenameRecord) -> Result<(), DirectoryError> {
        self.enter().await?;
        self.state
            .write()
            .renames
            .insert(record.old_username.clone(), record.new_username.clone());
        Ok(())
    }

    async fn delete_rename(&self, old_username: &str) -> Result<(), DirectoryError> {
        self.enter().await?;
        self.state.write().renames.remove(old_username);
        Ok(())
    }

    async fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, DirectoryError> {
        self.enter().await?;
        Ok(self.state.read().profiles.iter().find(|p| p.id == id).cloned())
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, DirectoryError> {
        self.enter().await?;
        Ok(self
            .state
            .read()
            .profiles
            .iter()
            .find(|p| p.username.as_deref() == Some(username))
            .cloned())
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if state.profiles.iter().any(|p| p.id == profile.id) {
            return Err(DirectoryError::Conflict(format!("profile {} exists", profile.id)));
        }
        if username_taken(&state, profile) {
            return Err(DirectoryError::Conflict("username is taken".into()));
        }
        state.profiles.push(profile.clone());
        Ok(profile.clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if username_taken(&state, profile) {
            return Err(DirectoryError::Conflict("username is taken".into()));
        }
        let slot = state
            .profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or(DirectoryError::NotFound)?;
        *slot = profile.clone();
        Ok(profile.clone())
    }

    async fn list_links(&self, owner_id: Uuid) -> Result<Vec<SocialLink>, DirectoryError> {
        self.enter().await?;
        Ok(self
            .state
            .read()
            .links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn count_links(&self, owner_id: Uuid) -> Result<i64, DirectoryError> {
        self.enter().await?;
        let count = self
            .state
            .read()
            .links
            .iter()
            .filter(|l| l.owner_id == owner_id)
            .count();
        Ok(count as i64)
    }

    async fn find_link(&self, id: Uuid) -> Result<Option<SocialLink>, DirectoryError> {
        self.enter().await?;
        Ok(self.link(id))
    }

    async fn insert_link(&self, link: &SocialLink) -> Result<SocialLink, DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if state.links.iter().any(|l| l.id == link.id) {
            return Err(DirectoryError::Conflict(format!("link {} exists", link.id)));
        }
        state.links.push(link.clone());
        Ok(link.clone())
    }

    async fn update_link(&self, id: Uuid, patch: &LinkPatch) -> Result<SocialLink, DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        if let Some(remaining) = state.link_updates_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(DirectoryError::Unavailable("link update failed".into()));
            }
            *remaining -= 1;
        }
        let link = state
            .links
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(DirectoryError::NotFound)?;
        patch.apply(link);
        Ok(link.clone())
    }

    async fn delete_link(&self, id: Uuid) -> Result<(), DirectoryError> {
        self.enter().await?;
        let mut state = self.state.write();
        let before = state.links.len();
        state.links.retain(|l| l.id != id);
        if state.links.len() == before {
            return Err(DirectoryError::NotFound);
        }
        Ok(())
    }
}
