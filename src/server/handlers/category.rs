use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::models::IssueCategory;
use crate::server::handlers::ApiError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    pub user_id: Uuid,
}

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<IssueCategory>>, ApiError> {
    let categories = state.manager.list_categories().await?;
    Ok(Json(categories))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<IssueCategory>), ApiError> {
    let category = state
        .manager
        .create_category(&request.name, request.user_id)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<IssueCategory>, ApiError> {
    let category = state
        .manager
        .update_category(id, &request.name, request.user_id)
        .await?;
    Ok(Json(category))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.manager.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
