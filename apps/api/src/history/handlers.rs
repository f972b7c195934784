use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::pagination::{PageMeta, PageQuery, PageRequest};
use crate::history::store::{count_analyses, delete_analysis, get_analysis, list_analyses};
use crate::models::history::AnalysisRecord;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HistoryPageResponse {
    pub history: Vec<AnalysisRecord>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

/// GET /api/history?page=&per_page=
pub async fn handle_list_history(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<HistoryPageResponse>, AppError> {
    let page = PageRequest::from(query);
    let total = count_analyses(&state.db).await?;
    let history = list_analyses(&state.db, page).await?;

    Ok(Json(HistoryPageResponse {
        history,
        meta: PageMeta::new(page, total),
    }))
}

/// GET /api/history/:id
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisRecord>, AppError> {
    let record = get_analysis(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Analysis {id} not found")))?;
    Ok(Json(record))
}

/// DELETE /api/history/:id
pub async fn handle_delete_analysis(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, AppError> {
    if !delete_analysis(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Analysis {id} not found")));
    }

    info!("Deleted analysis {id}");
    Ok(Json(DeleteResponse {
        success: true,
        message: "Analysis deleted".to_string(),
    }))
}
