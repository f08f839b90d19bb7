use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::jobs::documents::{self, Document};
use crate::jobs::metrics::{compute_metrics, JobMetrics};
use crate::jobs::models::{JobRecord, JobStatus, JobUpdate, NewJob};
use crate::jobs::store::{BoardColumn, JobFilter};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    pub status: JobStatus,
}

#[derive(Debug, Deserialize)]
pub struct AttachDocument {
    #[serde(alias = "documentId")]
    pub document_id: String,
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub metrics: JobMetrics,
    pub board: Vec<BoardColumn>,
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    AppQuery(filter): AppQuery<JobFilter>,
) -> Json<Vec<JobRecord>> {
    Json(state.store.list(&filter).await)
}

/// POST /api/v1/jobs
pub async fn handle_add_job(
    State(state): State<AppState>,
    AppJson(job): AppJson<NewJob>,
) -> Result<(StatusCode, Json<JobRecord>), AppError> {
    let record = state.store.add(job).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.store.get(id).await?))
}

/// PUT /api/v1/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(update): AppJson<JobUpdate>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.store.update(id, update).await?))
}

/// DELETE /api/v1/jobs/:id
pub async fn handle_delete_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.store.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/jobs/:id/status
pub async fn handle_set_status(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(change): AppJson<StatusChange>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.store.set_status(id, change.status).await?))
}

/// POST /api/v1/jobs/:id/archive
pub async fn handle_archive_job(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.store.archive(id).await?))
}

/// POST /api/v1/jobs/:id/documents
pub async fn handle_attach_document(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(req): AppJson<AttachDocument>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(
        state.store.attach_document(id, req.document_id.trim()).await?,
    ))
}

/// DELETE /api/v1/jobs/:id/documents/:doc_id
pub async fn handle_detach_document(
    State(state): State<AppState>,
    AppPath((id, doc_id)): AppPath<(Uuid, String)>,
) -> Result<Json<JobRecord>, AppError> {
    Ok(Json(state.store.detach_document(id, &doc_id).await?))
}

/// GET /api/v1/board
pub async fn handle_board(State(state): State<AppState>) -> Json<Vec<BoardColumn>> {
    Json(state.store.board().await)
}

/// GET /api/v1/metrics
pub async fn handle_metrics(State(state): State<AppState>) -> Json<JobMetrics> {
    Json(compute_metrics(&state.store.active().await))
}

/// GET /api/v1/dashboard
pub async fn handle_dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let metrics = compute_metrics(&state.store.active().await);
    let board = state.store.board().await;
    Json(DashboardResponse { metrics, board })
}

/// GET /api/v1/documents
pub async fn handle_documents() -> Json<&'static [Document]> {
    Json(documents::catalog())
}
