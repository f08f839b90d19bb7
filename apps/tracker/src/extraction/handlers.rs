//! Axum route handlers for URL extraction.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::extract::AppJson;
use crate::extraction::ExtractedJob;
use crate::jobs::models::JobRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExtractJobRequest {
    /// Absent, null and blank are all "URL is required".
    #[serde(default)]
    pub url: Option<String>,
}

impl ExtractJobRequest {
    fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }
}

/// POST /api/extract-job
///
/// Asks the model for the listing's fields. Nothing is stored; the dashboard
/// uses the result to pre-fill its add form.
pub async fn handle_extract_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExtractJobRequest>,
) -> Result<Json<ExtractedJob>, AppError> {
    let extracted = state.extractor.extract(request.url()).await?;
    Ok(Json(extracted))
}

/// POST /api/v1/jobs/import
///
/// Extracts the listing and stores it as a new `Saved` job.
pub async fn handle_import_job(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExtractJobRequest>,
) -> Result<(StatusCode, Json<JobRecord>), AppError> {
    let extracted = state.extractor.extract(request.url()).await?;
    let record = state.store.add(extracted.into_new_job()).await?;
    Ok((StatusCode::CREATED, Json(record)))
}
