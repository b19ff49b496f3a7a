use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error};
use uuid::Uuid;

use bizcard_core::{Directory, DirectoryError, LinkPatch};
use bizcard_types::models::{Profile, RenameRecord, SocialLink};

use crate::Database;
use crate::models::{LinkRow, ProfileRow};

/// [`Directory`] backed by the local SQLite database.
///
/// rusqlite is blocking, so every call is moved onto the blocking pool.
#[derive(Clone)]
pub struct SqliteDirectory {
    db: Arc<Database>,
}

impl SqliteDirectory {
    pub fn new(db: Database) -> Self {
        Self { db: Arc::new(db) }
    }

    async fn run<F, T>(&self, f: F) -> Result<T, DirectoryError>
    where
        F: FnOnce(&Database) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                DirectoryError::Unavailable(e.to_string())
            })?
            .map_err(classify)
    }
}

/// Unique-constraint failures are conflicts; anything else is an outage.
fn classify(err: anyhow::Error) -> DirectoryError {
    let constraint = err
        .downcast_ref::<rusqlite::Error>()
        .and_then(|e| e.sqlite_error_code())
        .is_some_and(|code| code == rusqlite::ErrorCode::ConstraintViolation);
    if constraint {
        debug!("Constraint violation: {:#}", err);
        DirectoryError::Conflict(conflict_message(&err.to_string()).to_string())
    } else {
        error!("Directory query failed: {:#}", err);
        DirectoryError::Unavailable(err.to_string())
    }
}

/// Client-facing text for a constraint failure; SQLite's own message names
/// tables and columns.
fn conflict_message(raw: &str) -> &'static str {
    if raw.contains("profiles.username") {
        "username is taken"
    } else {
        "record already exists"
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // datetime('now') defaults are "YYYY-MM-DD HH:MM:SS" without a zone.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .with_context(|| format!("corrupt timestamp '{}'", raw))
}

fn profile_from_row(row: ProfileRow) -> Result<Profile> {
    Ok(Profile {
        id: row
            .id
            .parse()
            .with_context(|| format!("corrupt profile id '{}'", row.id))?,
        username: row.username,
        full_name: row.full_name,
        company: row.company,
        about: row.about,
        phone: row.phone,
        email: row.email,
        website: row.website,
        profile_image_url: row.profile_image_url,
        banner_image_url: row.banner_image_url,
        theme: row.theme,
        created_at: parse_timestamp(&row.created_at)?,
        updated_at: parse_timestamp(&row.updated_at)?,
    })
}

fn profile_to_row(profile: &Profile) -> ProfileRow {
    ProfileRow {
        id: profile.id.to_string(),
        username: profile.username.clone(),
        full_name: profile.full_name.clone(),
        company: profile.company.clone(),
        about: profile.about.clone(),
        phone: profile.phone.clone(),
        email: profile.email.clone(),
        website: profile.website.clone(),
        profile_image_url: profile.profile_image_url.clone(),
        banner_image_url: profile.banner_image_url.clone(),
        theme: profile.theme.clone(),
        created_at: profile.created_at.to_rfc3339(),
        updated_at: profile.updated_at.to_rfc3339(),
    }
}

fn link_from_row(row: LinkRow) -> Result<SocialLink> {
    Ok(SocialLink {
        id: row
            .id
            .parse()
            .with_context(|| format!("corrupt link id '{}'", row.id))?,
        owner_id: row
            .owner_id
            .parse()
            .with_context(|| format!("corrupt owner_id '{}' on link '{}'", row.owner_id, row.id))?,
        platform: row.platform,
        target_url: row.target_url,
        order_index: row.order_index,
        created_at: parse_timestamp(&row.created_at)?,
    })
}

fn link_to_row(link: &SocialLink) -> LinkRow {
    LinkRow {
        id: link.id.to_string(),
        owner_id: link.owner_id.to_string(),
        platform: link.platform.clone(),
        target_url: link.target_url.clone(),
        order_index: link.order_index,
        created_at: link.created_at.to_rfc3339(),
    }
}

#[async_trait]
impl Directory for SqliteDirectory {
    async fn find_rename(&self, old_username: &str) -> Result<Option<RenameRecord>, DirectoryError> {
        let old = old_username.to_string();
        self.run(move |db| {
            Ok(db
                .get_redirect(&old)?
                .map(|r| RenameRecord::new(r.old_username, r.new_username)))
        })
        .await
    }

    async fn put_rename(&self, record: &RenameRecord) -> Result<(), DirectoryError> {
        let record = record.clone();
        self.run(move |db| db.upsert_redirect(&record.old_username, &record.new_username))
            .await
    }

    async fn delete_rename(&self, old_username: &str) -> Result<(), DirectoryError> {
        let old = old_username.to_string();
        self.run(move |db| db.delete_redirect(&old)).await
    }

    async fn find_profile_by_id(&self, id: Uuid) -> Result<Option<Profile>, DirectoryError> {
        self.run(move |db| {
            db.get_profile_by_id(&id.to_string())?
                .map(profile_from_row)
                .transpose()
        })
        .await
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Profile>, DirectoryError> {
        let username = username.to_string();
        self.run(move |db| {
            db.get_profile_by_username(&username)?
                .map(profile_from_row)
                .transpose()
        })
        .await
    }

    async fn insert_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError> {
        let row = profile_to_row(profile);
        self.run(move |db| db.insert_profile(&row)).await?;
        Ok(profile.clone())
    }

    async fn update_profile(&self, profile: &Profile) -> Result<Profile, DirectoryError> {
        let row = profile_to_row(profile);
        if !self.run(move |db| db.update_profile(&row)).await? {
            return Err(DirectoryError::NotFound);
        }
        Ok(profile.clone())
    }

    async fn list_links(&self, owner_id: Uuid) -> Result<Vec<SocialLink>, DirectoryError> {
        self.run(move |db| {
            db.get_links_for_owner(&owner_id.to_string())?
                .into_iter()
                .map(link_from_row)
                .collect()
        })
        .await
    }

    async fn count_links(&self, owner_id: Uuid) -> Result<i64, DirectoryError> {
        self.run(move |db| db.count_links_for_owner(&owner_id.to_string()))
            .await
    }

    async fn find_link(&self, id: Uuid) -> Result<Option<SocialLink>, DirectoryError> {
        self.run(move |db| db.get_link(&id.to_string())?.map(link_from_row).transpose())
            .await
    }

    async fn insert_link(&self, link: &SocialLink) -> Result<SocialLink, DirectoryError> {
        let row = link_to_row(link);
        self.run(move |db| db.insert_link(&row)).await?;
        Ok(link.clone())
    }

    async fn update_link(&self, id: Uuid, patch: &LinkPatch) -> Result<SocialLink, DirectoryError> {
        let patch = patch.clone();
        self.run(move |db| {
            db.update_link(
                &id.to_string(),
                patch.platform.as_deref(),
                patch.target_url.as_deref(),
                patch.order_index,
            )?
            .map(link_from_row)
            .transpose()
        })
        .await?
        .ok_or(DirectoryError::NotFound)
    }

    async fn delete_link(&self, id: Uuid) -> Result<(), DirectoryError> {
        if !self.run(move |db| db.delete_link(&id.to_string())).await? {
            return Err(DirectoryError::NotFound);
        }
        Ok(())
    }
}
