use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use tracing::info;

use bizcard_core::resolver::{self, ProfileLookup};
use bizcard_core::{CoreError, Principal, links, profiles};
use bizcard_types::api::{PublicProfileResponse, ResolveResponse, UpdateProfileRequest};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /resolve/{username}
pub async fn resolve_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<ResolveResponse> {
    let resolution = resolver::resolve(state.directory.as_ref(), &username).await;
    Json(ResolveResponse {
        final_username: resolution.final_username,
        redirected: resolution.redirected,
    })
}

/// GET /profiles/{username}: 301 for stale names, else the card with links.
pub async fn public_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    let dir = state.directory.as_ref();

    match resolver::lookup_profile(dir, &username).await? {
        ProfileLookup::Redirect(target) => {
            info!("Redirecting {} -> {}", username, target);
            let location = HeaderValue::try_from(format!("/profiles/{}", target))
                .map_err(|_| CoreError::NotFound)?;
            Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response())
        }
        ProfileLookup::Found(profile) => {
            let links = links::for_profile(dir, &profile).await?;
            Ok(Json(PublicProfileResponse { profile, links }).into_response())
        }
        ProfileLookup::NotFound => Err(CoreError::NotFound.into()),
    }
}

/// GET /profiles/{username}/vcard
pub async fn download_vcard(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, ApiError> {
    let card = profiles::vcard(state.directory.as_ref(), &username).await?;
    let disposition = HeaderValue::try_from(format!("attachment; filename=\"{}.vcf\"", username))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment; filename=\"contact.vcf\""));

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/vcard; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        card,
    )
        .into_response())
}

/// GET /me/profile
pub async fn get_own(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = profiles::get_own(state.directory.as_ref(), &principal).await?;
    Ok(Json(profile))
}

/// PUT /me/profile
pub async fn update_own(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(req), _): WithRejection<Json<UpdateProfileRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let profile = profiles::update_own(state.directory.as_ref(), &principal, req).await?;
    Ok(Json(profile))
}
