use crate::Database;
use crate::models::{LinkRow, ProfileRow, RedirectRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, Row};

const PROFILE_COLUMNS: &str = "id, username, full_name, company, about, phone, email, website,
     profile_image_url, banner_image_url, theme, created_at, updated_at";

const LINK_COLUMNS: &str = "id, owner_id, platform, target_url, order_index, created_at";

impl Database {
    // -- Redirects --

    pub fn get_redirect(&self, old_username: &str) -> Result<Option<RedirectRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT old_username, new_username FROM username_redirects WHERE old_username = ?1",
                    [old_username],
                    |row| {
                        Ok(RedirectRow {
                            old_username: row.get(0)?,
                            new_username: row.get(1)?,
                        })
                    },
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn upsert_redirect(&self, old_username: &str, new_username: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO username_redirects (old_username, new_username) VALUES (?1, ?2)
                 ON CONFLICT(old_username) DO UPDATE SET
                     new_username = excluded.new_username,
                     created_at = datetime('now')",
                (old_username, new_username),
            )?;
            Ok(())
        })
    }

    pub fn delete_redirect(&self, old_username: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "DELETE FROM username_redirects WHERE old_username = ?1",
                [old_username],
            )?;
            Ok(())
        })
    }

    // -- Profiles --

    pub fn get_profile_by_id(&self, id: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| query_profile(conn, "id", id))
    }

    pub fn get_profile_by_username(&self, username: &str) -> Result<Option<ProfileRow>> {
        self.with_conn(|conn| query_profile(conn, "username", username))
    }

    pub fn insert_profile(&self, row: &ProfileRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO profiles ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                    PROFILE_COLUMNS
                ),
                rusqlite::params![
                    row.id,
                    row.username,
                    row.full_name,
                    row.company,
                    row.about,
                    row.phone,
                    row.email,
                    row.website,
                    row.profile_image_url,
                    row.banner_image_url,
                    row.theme,
                    row.created_at,
                    row.updated_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Returns false when no profile has this id.
    pub fn update_profile(&self, row: &ProfileRow) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE profiles SET
                     username = ?2, full_name = ?3, company = ?4, about = ?5, phone = ?6,
                     email = ?7, website = ?8, profile_image_url = ?9, banner_image_url = ?10,
                     theme = ?11, updated_at = ?12
                 WHERE id = ?1",
                rusqlite::params![
                    row.id,
                    row.username,
                    row.full_name,
                    row.company,
                    row.about,
                    row.phone,
                    row.email,
                    row.website,
                    row.profile_image_url,
                    row.banner_image_url,
                    row.theme,
                    row.updated_at,
                ],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Social links --

    /// Display order, with insertion order breaking ties.
    pub fn get_links_for_owner(&self, owner_id: &str) -> Result<Vec<LinkRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM social_links WHERE owner_id = ?1 ORDER BY order_index ASC, rowid ASC",
                LINK_COLUMNS
            ))?;
            let rows = stmt
                .query_map([owner_id], link_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_links_for_owner(&self, owner_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM social_links WHERE owner_id = ?1",
                [owner_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    pub fn get_link(&self, id: &str) -> Result<Option<LinkRow>> {
        self.with_conn(|conn| query_link(conn, id))
    }

    pub fn insert_link(&self, row: &LinkRow) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                &format!(
                    "INSERT INTO social_links ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                    LINK_COLUMNS
                ),
                rusqlite::params![
                    row.id,
                    row.owner_id,
                    row.platform,
                    row.target_url,
                    row.order_index,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// Patch a link and return it as stored, or `None` if the id is unknown.
    pub fn update_link(
        &self,
        id: &str,
        platform: Option<&str>,
        target_url: Option<&str>,
        order_index: Option<i64>,
    ) -> Result<Option<LinkRow>> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE social_links SET
                     platform = COALESCE(?2, platform),
                     target_url = COALESCE(?3, target_url),
                     order_index = COALESCE(?4, order_index)
                 WHERE id = ?1",
                rusqlite::params![id, platform, target_url, order_index],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_link(conn, id)
        })
    }

    /// Returns false when nothing was deleted.
    pub fn delete_link(&self, id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("DELETE FROM social_links WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }
}

fn query_profile(conn: &Connection, column: &str, value: &str) -> Result<Option<ProfileRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM profiles WHERE {} = ?1",
        PROFILE_COLUMNS, column
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(ProfileRow {
                id: row.get(0)?,
                username: row.get(1)?,
                full_name: row.get(2)?,
                company: row.get(3)?,
                about: row.get(4)?,
                phone: row.get(5)?,
                email: row.get(6)?,
                website: row.get(7)?,
                profile_image_url: row.get(8)?,
                banner_image_url: row.get(9)?,
                theme: row.get(10)?,
                created_at: row.get(11)?,
                updated_at: row.get(12)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_link(conn: &Connection, id: &str) -> Result<Option<LinkRow>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM social_links WHERE id = ?1", LINK_COLUMNS),
            [id],
            link_from_row,
        )
        .optional()?;
    Ok(row)
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkRow> {
    Ok(LinkRow {
        id: row.get(0)?,
        owner_id: row.get(1)?,
        platform: row.get(2)?,
        target_url: row.get(3)?,
        order_index: row.get(4)?,
        created_at: row.get(5)?,
    })
}
