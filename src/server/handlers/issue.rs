use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Issue;
use crate::server::handlers::ApiError;
use crate::server::AppState;
use crate::tracker::changes::UpdateIssueRequest;
use crate::tracker::manager::CreateIssueRequest;

#[derive(Debug, Deserialize)]
pub struct IndexFilter {
    /// Restricts the listing to one reporter; the presentation layer passes
    /// this for non-admin viewers.
    pub created_by: Option<Uuid>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<IndexFilter>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let issues = state.manager.list_issues(filter.created_by).await?;
    Ok(Json(issues))
}

pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateIssueRequest>,
) -> Result<(StatusCode, Json<Issue>), ApiError> {
    let issue = state.manager.create_issue(request).await?;
    Ok((StatusCode::CREATED, Json(issue)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Issue>, ApiError> {
    let issue = state.manager.get_issue(id).await?;
    Ok(Json(issue))
}

pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateIssueRequest>,
) -> Result<StatusCode, ApiError> {
    state.manager.update_issue(id, request).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct DowntimeResponse {
    pub success: bool,
    pub message: String,
    pub data: Issue,
}

pub async fn toggle_downtime(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DowntimeResponse>, ApiError> {
    let (issue, phase) = state.manager.toggle_downtime(id).await?;
    Ok(Json(DowntimeResponse {
        success: true,
        message: phase.message().to_string(),
        data: issue,
    }))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.manager.delete_issue(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
