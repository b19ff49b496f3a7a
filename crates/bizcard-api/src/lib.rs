pub mod error;
pub mod links;
pub mod middleware;
pub mod profiles;
pub mod state;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// All routes. Transport layers (CORS, tracing) are added by the binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/resolve/{username}", get(profiles::resolve_username))
        .route("/profiles/{username}", get(profiles::public_profile))
        .route("/profiles/{username}/links", get(links::public_links))
        .route("/profiles/{username}/vcard", get(profiles::download_vcard));

    let protected_routes = Router::new()
        .route("/me/profile", get(profiles::get_own).put(profiles::update_own))
        .route("/users/{owner_id}/links", get(links::list_links))
        .route("/links", post(links::create_link))
        .route(
            "/links/{link_id}",
            patch(links::edit_link).delete(links::delete_link),
        )
        .route("/links/{link_id}/move", post(links::move_link))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
