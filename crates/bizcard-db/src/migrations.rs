use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (profiles, redirects, social links)");
        conn.execute_batch(
            "
            CREATE TABLE profiles (
                id                  TEXT PRIMARY KEY,
                username            TEXT UNIQUE,
                full_name           TEXT,
                company             TEXT,
                about               TEXT,
                phone               TEXT,
                email               TEXT,
                website             TEXT,
                profile_image_url   TEXT,
                banner_image_url    TEXT,
                theme               TEXT,
                created_at          TEXT NOT NULL,
                updated_at          TEXT NOT NULL
            );

            CREATE TABLE username_redirects (
                old_username    TEXT PRIMARY KEY,
                new_username    TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE social_links (
                id              TEXT PRIMARY KEY,
                owner_id        TEXT NOT NULL,
                platform        TEXT NOT NULL,
                target_url      TEXT NOT NULL,
                order_index     INTEGER NOT NULL,
                created_at      TEXT NOT NULL
            );

            CREATE INDEX idx_social_links_owner
                ON social_links(owner_id, order_index);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Database migrations complete");
    Ok(())
}
