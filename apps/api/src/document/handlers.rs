use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::document::model::DocumentTree;
use crate::document::store::SaveOutcome;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveRequest {
    pub content: DocumentTree,
    /// Current file; omit for "save as".
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OpenRequest {
    pub file_path: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OpenResponse {
    pub canceled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<DocumentTree>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/v1/documents/save
pub async fn handle_save(
    State(state): State<AppState>,
    Json(req): Json<SaveRequest>,
) -> Result<Json<SaveOutcome>, AppError> {
    let blob = req.content.to_blob()?;
    let outcome = state.store.save(&blob, req.file_path.as_deref()).await?;
    Ok(Json(outcome))
}

/// POST /api/v1/documents/open
pub async fn handle_open(
    State(state): State<AppState>,
    Json(req): Json<OpenRequest>,
) -> Result<Json<OpenResponse>, AppError> {
    let outcome = state.store.open(req.file_path.as_deref()).await?;
    let content = outcome
        .content
        .as_deref()
        .map(DocumentTree::parse)
        .transpose()?;
    Ok(Json(OpenResponse {
        canceled: outcome.canceled,
        content,
        file_path: outcome.file_path,
        error: outcome.error,
    }))
}
