pub mod auth;
pub mod donation;
pub mod health;
pub mod profile;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                   sign up (public)
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
/// /auth/me                       current user (requires auth)
///
/// /donations                     discover (public), submit (requires auth)
/// /donations/mine                caller's donations (requires auth)
/// /donations/{id}                get (public)
/// /donations/{id}/claim          claim (recipient only)
/// /donations/{id}/expire         expire (owning donor only)
///
/// /profile                       get, update (requires auth)
///
/// /users                         account summaries, `?active=` filter (public)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/donations", donation::router())
        .nest("/profile", profile::router())
        .nest("/users", users::router())
}
