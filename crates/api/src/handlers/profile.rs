//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::Json;
use foodshare_core::error::CoreError;
use foodshare_core::profile::ProfileUpdate;
use foodshare_db::models::user::{UpdateProfile, UserResponse};
use foodshare_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: auth_user.user_id,
        }))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/profile
///
/// Update the caller's name and/or mobile number. Absent fields are kept.
pub async fn update_profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<ProfileUpdate>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    input.check()?;
    let input = input.trimmed();

    let user = UserRepo::update_profile(
        &state.pool,
        auth_user.user_id,
        &UpdateProfile {
            full_name: input.full_name,
            mobile: input.mobile,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "User",
        id: auth_user.user_id,
    }))?;

    tracing::info!(user_id = user.id, "Profile updated");
    Ok(Json(DataResponse { data: user.into() }))
}
