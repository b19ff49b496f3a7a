use chrono::Utc;
use tracing::{info, warn};
use url::Url;
use uuid::Uuid;

use bizcard_types::models::{Direction, Profile, SocialLink};

use crate::directory::{Directory, LinkPatch};
use crate::error::{CoreError, CoreResult};
use crate::principal::Principal;

const MAX_PLATFORM_LEN: usize = 64;
const MAX_URL_LEN: usize = 2048;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Already at the requested edge.
    Unchanged,
    Swapped { moved: SocialLink, neighbor: SocialLink },
}

/// Sort into display order. Stable, so equal indices keep insertion order.
pub fn display_order(mut links: Vec<SocialLink>) -> Vec<SocialLink> {
    links.sort_by_key(|l| l.order_index);
    links
}

pub fn validate_platform(raw: &str) -> CoreResult<String> {
    let platform = raw.trim();
    if platform.is_empty() {
        return Err(CoreError::Validation("platform is required".into()));
    }
    if platform.chars().count() > MAX_PLATFORM_LEN {
        return Err(CoreError::Validation(format!(
            "platform must be at most {} characters",
            MAX_PLATFORM_LEN
        )));
    }
    Ok(platform.to_string())
}

/// Prepend `https://` to scheme-less input, then require an absolute URL with
/// a host. Returns the (possibly prefixed) input, not a re-serialised URL.
pub fn normalize_url(raw: &str) -> CoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("url is required".into()));
    }
    if trimmed.len() > MAX_URL_LEN {
        return Err(CoreError::Validation("url is too long".into()));
    }

    let has_scheme = trimmed
        .get(..8)
        .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
        || trimmed
            .get(..7)
            .is_some_and(|p| p.eq_ignore_ascii_case("http://"));
    let candidate = if has_scheme {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let invalid = || {
        CoreError::Validation(format!(
            "'{}' is not a valid URL (e.g. example.com or https://example.com)",
            trimmed
        ))
    };
    let parsed = Url::parse(&candidate).map_err(|_| invalid())?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }

    Ok(candidate)
}

/// Links of `owner_id` in display order. Only the owner may list them.
pub async fn list(
    dir: &dyn Directory,
    principal: &Principal,
    owner_id: Uuid,
) -> CoreResult<Vec<SocialLink>> {
    if principal.id != owner_id {
        warn!("Principal {} tried to list links of {}", principal.id, owner_id);
        return Err(CoreError::Permission);
    }
    Ok(display_order(dir.list_links(owner_id).await?))
}

/// Links shown on the public card for `username`.
pub async fn public_links(dir: &dyn Directory, username: &str) -> CoreResult<Vec<SocialLink>> {
    let profile = dir
        .find_profile_by_username(username)
        .await?
        .ok_or(CoreError::NotFound)?;
    for_profile(dir, &profile).await
}

/// Display-ordered links of an already fetched profile.
pub async fn for_profile(dir: &dyn Directory, profile: &Profile) -> CoreResult<Vec<SocialLink>> {
    Ok(display_order(dir.list_links(profile.id).await?))
}

/// Add a link at the end of the principal's list.
///
/// The index comes from a count read just before the insert, so two
/// concurrent appends can land on the same index.
pub async fn append(
    dir: &dyn Directory,
    principal: &Principal,
    platform: &str,
    target_url: &str,
) -> CoreResult<SocialLink> {
    let platform = validate_platform(platform)?;
    let target_url = normalize_url(target_url)?;

    let order_index = dir.count_links(principal.id).await?;
    let link = SocialLink {
        id: Uuid::new_v4(),
        owner_id: principal.id,
        platform,
        target_url,
        order_index,
        created_at: Utc::now(),
    };

    let created = dir.insert_link(&link).await?;
    info!(
        "Link {} ({}) added for {} at index {}",
        created.id, created.platform, principal.id, created.order_index
    );
    Ok(created)
}

/// Change platform and/or URL of an owned link. Order is untouched.
pub async fn edit(
    dir: &dyn Directory,
    principal: &Principal,
    link_id: Uuid,
    platform: Option<&str>,
    target_url: Option<&str>,
) -> CoreResult<SocialLink> {
    let patch = LinkPatch {
        platform: platform.map(validate_platform).transpose()?,
        target_url: target_url.map(normalize_url).transpose()?,
        order_index: None,
    };
    if patch.is_empty() {
        return Err(CoreError::Validation("nothing to update".into()));
    }

    owned_link(dir, principal, link_id).await?;
    Ok(dir.update_link(link_id, &patch).await?)
}

/// Delete an owned link. Remaining indices are not renumbered.
pub async fn remove(dir: &dyn Directory, principal: &Principal, link_id: Uuid) -> CoreResult<()> {
    owned_link(dir, principal, link_id).await?;
    dir.delete_link(link_id).await?;
    info!("Link {} removed by {}", link_id, principal.id);
    Ok(())
}

/// Swap an owned link's `order_index` with its display neighbour.
///
/// When both share an index only the neighbour is rewritten, one step past
/// the moved link. Otherwise the two writes are not atomic: if the second
/// fails the first stays applied and `ReorderIncomplete` is returned.
pub async fn reorder(
    dir: &dyn Directory,
    principal: &Principal,
    link_id: Uuid,
    direction: Direction,
) -> CoreResult<ReorderOutcome> {
    owned_link(dir, principal, link_id).await?;

    let links = display_order(dir.list_links(principal.id).await?);
    let pos = links
        .iter()
        .position(|l| l.id == link_id)
        .ok_or(CoreError::NotFound)?;

    let neighbor_pos = match direction {
        Direction::Up => pos.checked_sub(1),
        Direction::Down => Some(pos + 1).filter(|&p| p < links.len()),
    };
    let Some(neighbor_pos) = neighbor_pos else {
        return Ok(ReorderOutcome::Unchanged);
    };

    let moved = &links[pos];
    let neighbor = &links[neighbor_pos];

    if moved.order_index == neighbor.order_index {
        // Tie from concurrent appends or an append after a remove.
        let shifted = match direction {
            Direction::Up => neighbor.order_index + 1,
            Direction::Down => neighbor.order_index - 1,
        };
        let neighbor_after = dir
            .update_link(neighbor.id, &LinkPatch::order(shifted))
            .await?;
        info!(
            "Link {} moved {:?} past tied {} for {}",
            moved.id, direction, neighbor.id, principal.id
        );
        return Ok(ReorderOutcome::Swapped {
            moved: moved.clone(),
            neighbor: neighbor_after,
        });
    }

    let moved_after = dir
        .update_link(moved.id, &LinkPatch::order(neighbor.order_index))
        .await?;

    let neighbor_after = match dir
        .update_link(neighbor.id, &LinkPatch::order(moved.order_index))
        .await
    {
        Ok(link) => link,
        Err(e) => {
            warn!(
                "Reorder {} <-> {} left half-applied: {}",
                moved.id, neighbor.id, e
            );
            return Err(CoreError::ReorderIncomplete {
                moved: moved.id,
                neighbor: neighbor.id,
            });
        }
    };

    info!(
        "Link {} moved {:?} past {} for {}",
        moved.id, direction, neighbor.id, principal.id
    );
    Ok(ReorderOutcome::Swapped {
        moved: moved_after,
        neighbor: neighbor_after,
    })
}

async fn owned_link(
    dir: &dyn Directory,
    principal: &Principal,
    link_id: Uuid,
) -> CoreResult<SocialLink> {
    let link = dir.find_link(link_id).await?.ok_or(CoreError::NotFound)?;
    if link.owner_id != principal.id {
        warn!("Principal {} does not own link {}", principal.id, link_id);
        return Err(CoreError::Permission);
    }
    Ok(link)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_is_prepended_when_missing() {
        assert_eq!(normalize_url("example.com").unwrap(), "https://example.com");
        assert_eq!(
            normalize_url("  github.com/someone ").unwrap(),
            "https://github.com/someone"
        );
    }

    #[test]
    fn existing_scheme_is_kept() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com");
        assert_eq!(normalize_url("HTTPS://Example.com/a").unwrap(), "HTTPS://Example.com/a");
    }

    #[test]
    fn bad_urls_are_rejected() {
        for raw in ["", "   ", "https://", "not a url", "http://exa mple.com"] {
            let err = normalize_url(raw).unwrap_err();
            assert!(matches!(err, CoreError::Validation(_)), "{raw:?} accepted");
        }
    }

    #[test]
    fn platform_is_trimmed_and_required() {
        assert_eq!(validate_platform("  GitHub ").unwrap(), "GitHub");
        assert!(matches!(validate_platform(" "), Err(CoreError::Validation(_))));
        assert!(validate_platform(&"x".repeat(65)).is_err());
    }

    #[test]
    fn display_order_is_stable_on_ties() {
        let owner = Uuid::new_v4();
        let mk = |idx| SocialLink {
            id: Uuid::new_v4(),
            owner_id: owner,
            platform: "Website".into(),
            target_url: "https://example.com".into(),
            order_index: idx,
            created_at: Utc::now(),
        };
        let (a, b, c) = (mk(3), mk(1), mk(1));
        let ids: Vec<Uuid> = display_order(vec![a.clone(), b.clone(), c.clone()])
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec![b.id, c.id, a.id]);
    }
}
