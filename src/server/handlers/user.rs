use axum::extract::State;
use axum::Json;

use crate::database::models::User;
use crate::server::handlers::ApiError;
use crate::server::AppState;

/// Assignment directory consumed by the triage dropdowns.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.manager.list_users().await?;
    Ok(Json(users))
}
