#![allow(dead_code)]

use chrono::Utc;
use uuid::Uuid;

use bizcard_core::{Directory, MemoryDirectory, Principal};
use bizcard_types::models::{Profile, RenameRecord, SocialLink};

pub async fn seed_link(dir: &MemoryDirectory, owner: Uuid, order_index: i64) -> SocialLink {
    let link = SocialLink {
        id: Uuid::new_v4(),
        owner_id: owner,
        platform: "Website".into(),
        target_url: format!("https://example.com/{}", order_index),
        order_index,
        created_at: Utc::now(),
    };
    dir.insert_link(&link).await.unwrap()
}

pub async fn seed_profile(dir: &MemoryDirectory, username: &str) -> Profile {
    let mut profile = Profile::blank(Uuid::new_v4());
    profile.username = Some(username.to_string());
    dir.insert_profile(&profile).await.unwrap()
}

pub async fn seed_renames(dir: &MemoryDirectory, pairs: &[(&str, &str)]) {
    for (old, new) in pairs {
        dir.put_rename(&RenameRecord::new(*old, *new)).await.unwrap();
    }
}

pub fn principal(id: Uuid) -> Principal {
    Principal::new(id)
}

pub fn ids(links: &[SocialLink]) -> Vec<Uuid> {
    links.iter().map(|l| l.id).collect()
}
