use chrono::Utc;
use tracing::{info, warn};

use bizcard_types::api::UpdateProfileRequest;
use bizcard_types::models::{Profile, RenameRecord};

use crate::directory::Directory;
use crate::error::{CoreError, CoreResult};
use crate::links;
use crate::principal::Principal;
use crate::vcard;

const USERNAME_MIN: usize = 3;
const USERNAME_MAX: usize = 32;

pub fn validate_username(raw: &str) -> CoreResult<String> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be {}-{} characters",
            USERNAME_MIN, USERNAME_MAX
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits, '_' and '-'".into(),
        ));
    }
    Ok(username.to_string())
}

pub async fn get_own(dir: &dyn Directory, principal: &Principal) -> CoreResult<Profile> {
    dir.find_profile_by_id(principal.id)
        .await?
        .ok_or(CoreError::NotFound)
}

/// Create or update the principal's profile.
///
/// A username change records `old -> new` for the redirect resolver and drops
/// any record keyed on the new name, so a live handle never redirects away.
pub async fn update_own(
    dir: &dyn Directory,
    principal: &Principal,
    req: UpdateProfileRequest,
) -> CoreResult<Profile> {
    let new_username = req.username.as_deref().map(validate_username).transpose()?;

    let existing = dir.find_profile_by_id(principal.id).await?;
    let is_new = existing.is_none();
    let mut profile = existing.unwrap_or_else(|| Profile::blank(principal.id));
    let old_username = profile.username.clone();

    if let Some(name) = &new_username {
        if old_username.as_deref() != Some(name.as_str()) {
            if let Some(holder) = dir.find_profile_by_username(name).await? {
                if holder.id != principal.id {
                    return Err(CoreError::Conflict(format!("username '{}' is taken", name)));
                }
            }
        }
        profile.username = Some(name.clone());
    }

    set_field(&mut profile.full_name, req.full_name);
    set_field(&mut profile.company, req.company);
    set_field(&mut profile.about, req.about);
    set_field(&mut profile.phone, req.phone);
    set_field(&mut profile.email, req.email);
    set_field(&mut profile.website, req.website);
    set_field(&mut profile.profile_image_url, req.profile_image_url);
    set_field(&mut profile.banner_image_url, req.banner_image_url);
    set_field(&mut profile.theme, req.theme);
    profile.updated_at = Utc::now();

    let saved = if is_new {
        dir.insert_profile(&profile).await?
    } else {
        dir.update_profile(&profile).await?
    };

    if let Some(new) = new_username.filter(|n| old_username.as_ref() != Some(n)) {
        record_rename(dir, old_username.as_deref(), &new).await?;
        match old_username {
            Some(old) => info!("Profile {} renamed {} -> {}", principal.id, old, new),
            None => info!("Profile {} claimed username {}", principal.id, new),
        }
    }

    Ok(saved)
}

/// vCard for the profile currently holding `username`.
pub async fn vcard(dir: &dyn Directory, username: &str) -> CoreResult<String> {
    let profile = dir
        .find_profile_by_username(username)
        .await?
        .ok_or(CoreError::NotFound)?;
    let links = links::for_profile(dir, &profile).await?;
    Ok(vcard::render(&profile, &links))
}

/// Drop any record keyed on the claimed name, then point `old` at it.
async fn record_rename(dir: &dyn Directory, old: Option<&str>, new: &str) -> CoreResult<()> {
    let result = async {
        dir.delete_rename(new).await?;
        match old {
            Some(old) => dir.put_rename(&RenameRecord::new(old, new)).await,
            None => Ok(()),
        }
    }
    .await;

    result.map_err(|e| {
        warn!(
            "Profile saved as '{}' but redirect records were not updated (previous name {:?}): {}",
            new, old, e
        );
        CoreError::from(e)
    })
}

/// `None` leaves the field alone, a blank string clears it.
fn set_field(field: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        let value = value.trim();
        *field = (!value.is_empty()).then(|| value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames_are_checked() {
        assert_eq!(validate_username(" alice_99 ").unwrap(), "alice_99");
        assert!(validate_username("al").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("alice smith").is_err());
        assert!(validate_username("alice/../x").is_err());
    }

    #[test]
    fn blank_values_clear_fields() {
        let mut field = Some("old".to_string());
        set_field(&mut field, None);
        assert_eq!(field.as_deref(), Some("old"));
        set_field(&mut field, Some("  new ".into()));
        assert_eq!(field.as_deref(), Some("new"));
        set_field(&mut field, Some("   ".into()));
        assert_eq!(field, None);
    }
}
