//! Route definitions for the `/donations` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::donation;
use crate::state::AppState;

/// Routes mounted at `/donations`.
///
/// ```text
/// GET    /              -> list_donations
/// POST   /              -> create_donation
/// GET    /mine          -> list_mine
/// GET    /{id}          -> get_donation
/// POST   /{id}/claim    -> claim_donation
/// POST   /{id}/expire   -> expire_donation
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(donation::list_donations).post(donation::create_donation),
        )
        .route("/mine", get(donation::list_mine))
        .route("/{id}", get(donation::get_donation))
        .route("/{id}/claim", post(donation::claim_donation))
        .route("/{id}/expire", post(donation::expire_donation))
}
