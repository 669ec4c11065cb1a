use axum::extract::{Query, State};
use axum::Json;
use foodshare_db::models::user::UserSummary;
use foodshare_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::query::ActiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users?active=true|false
///
/// Public account summaries. Without `active`, every account is listed.
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ActiveParams>,
) -> AppResult<Json<DataResponse<Vec<UserSummary>>>> {
    let users = UserRepo::list_summaries(&state.pool, params.active).await?;
    Ok(Json(DataResponse { data: users }))
}
