use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Direction, Profile, SocialLink};

// -- JWT Claims --

/// Bearer token claims issued by the external auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    pub exp: usize,
}

// -- Redirects --

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveResponse {
    pub final_username: String,
    pub redirected: bool,
}

// -- Profiles --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileRequest {
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
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PublicProfileResponse {
    pub profile: Profile,
    pub links: Vec<SocialLink>,
}

// -- Links --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateLinkRequest {
    pub platform: String,
    #[serde(alias = "url")]
    pub target_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditLinkRequest {
    pub platform: Option<String>,
    #[serde(alias = "url")]
    pub target_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MoveLinkRequest {
    pub direction: Direction,
}

/// `links` holds the swapped pair, or the whole unchanged list when the link
/// was already at the requested edge.
#[derive(Debug, Serialize, Deserialize)]
pub struct MoveLinkResponse {
    pub swapped: bool,
    pub links: Vec<SocialLink>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
