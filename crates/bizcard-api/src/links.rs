use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use uuid::Uuid;

use bizcard_core::Principal;
use bizcard_core::links::{self, ReorderOutcome};
use bizcard_types::api::{CreateLinkRequest, EditLinkRequest, MoveLinkRequest, MoveLinkResponse};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /profiles/{username}/links (public, polled by the card page)
pub async fn public_links(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let links = links::public_links(state.directory.as_ref(), &username).await?;
    Ok(Json(links))
}

/// GET /users/{owner_id}/links
pub async fn list_links(
    State(state): State<AppState>,
    WithRejection(Path(owner_id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, ApiError> {
    let links = links::list(state.directory.as_ref(), &principal, owner_id).await?;
    Ok(Json(links))
}

/// POST /links
pub async fn create_link(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(req), _): WithRejection<Json<CreateLinkRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let link = links::append(
        state.directory.as_ref(),
        &principal,
        &req.platform,
        &req.target_url,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(link)))
}

/// PATCH /links/{link_id}
pub async fn edit_link(
    State(state): State<AppState>,
    WithRejection(Path(link_id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(req), _): WithRejection<Json<EditLinkRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let link = links::edit(
        state.directory.as_ref(),
        &principal,
        link_id,
        req.platform.as_deref(),
        req.target_url.as_deref(),
    )
    .await?;
    Ok(Json(link))
}

/// DELETE /links/{link_id}
pub async fn delete_link(
    State(state): State<AppState>,
    WithRejection(Path(link_id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(principal): Extension<Principal>,
) -> Result<StatusCode, ApiError> {
    links::remove(state.directory.as_ref(), &principal, link_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /links/{link_id}/move
pub async fn move_link(
    State(state): State<AppState>,
    WithRejection(Path(link_id), _): WithRejection<Path<Uuid>, ApiError>,
    Extension(principal): Extension<Principal>,
    WithRejection(Json(req), _): WithRejection<Json<MoveLinkRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let dir = state.directory.as_ref();
    let outcome = links::reorder(dir, &principal, link_id, req.direction).await?;

    let response = match outcome {
        ReorderOutcome::Unchanged => MoveLinkResponse {
            swapped: false,
            links: links::list(dir, &principal, principal.id).await?,
        },
        ReorderOutcome::Swapped { moved, neighbor } => MoveLinkResponse {
            swapped: true,
            links: vec![moved, neighbor],
        },
    };
    Ok(Json(response))
}
