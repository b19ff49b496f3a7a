use std::collections::HashSet;

use tracing::{debug, warn};

use bizcard_types::models::Profile;

use crate::directory::Directory;
use crate::error::CoreResult;

/// Upper bound on rename hops followed for a single lookup.
pub const MAX_HOPS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub final_username: String,
    /// At least one rename record was followed.
    pub redirected: bool,
    /// Every name visited, starting with the requested one.
    pub chain: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileLookup {
    Found(Profile),
    /// The requested name is stale; send the client here permanently.
    Redirect(String),
    NotFound,
}

/// Follow rename records from `requested` to the current username.
///
/// Never fails: a cycle, an exhausted hop budget or a Directory error all end
/// the walk at the last name reached.
pub async fn resolve(dir: &dyn Directory, requested: &str) -> Resolution {
    let mut visited: HashSet<String> = HashSet::new();
    let mut chain = vec![requested.to_string()];
    let mut current = requested.to_string();
    let mut redirected = false;

    for _ in 0..MAX_HOPS {
        if !visited.insert(current.clone()) {
            warn!("Circular username redirect from '{}' at '{}'", requested, current);
            break;
        }

        match dir.find_rename(&current).await {
            Ok(Some(record)) => {
                current = record.new_username;
                chain.push(current.clone());
                redirected = true;
            }
            Ok(None) => break,
            Err(e) => {
                warn!("Redirect lookup for '{}' failed, stopping walk: {}", current, e);
                break;
            }
        }
    }

    if redirected {
        debug!("Resolved {}", chain.join(" -> "));
    }

    Resolution {
        final_username: current,
        redirected,
        chain,
    }
}

/// Resolve `requested` and fetch the profile it names.
///
/// When the profile is missing, the rename table is consulted once more for
/// the original name, since a rename may have been written after the walk.
/// A target already on the walked chain is ignored so cycles end in NotFound
/// instead of bouncing between names.
pub async fn lookup_profile(dir: &dyn Directory, requested: &str) -> CoreResult<ProfileLookup> {
    let resolution = resolve(dir, requested).await;
    if resolution.redirected && resolution.final_username != requested {
        return Ok(ProfileLookup::Redirect(resolution.final_username));
    }

    let current = resolution.final_username;
    if let Some(profile) = dir.find_profile_by_username(&current).await? {
        return Ok(ProfileLookup::Found(profile));
    }

    match dir.find_rename(requested).await {
        Ok(Some(record)) if !resolution.chain.contains(&record.new_username) => {
            debug!("Found missed redirect {} -> {}", requested, record.new_username);
            Ok(ProfileLookup::Redirect(record.new_username))
        }
        Ok(_) => Ok(ProfileLookup::NotFound),
        Err(e) => {
            warn!("Missed-redirect check for '{}' failed: {}", requested, e);
            Ok(ProfileLookup::NotFound)
        }
    }
}
