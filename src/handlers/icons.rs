use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json};
use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::icon_storage;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
}

/// Accepts a multipart form with a `file` field.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.to_string()))?
    {
        if field.name() != Some("file") {
            debug!(field = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {}", e)))?;

        let filename = state.icons.store(&original_name, &bytes).await?;
        return Ok(Json(UploadResponse { filename }));
    }

    Err(AppError::Validation("Missing 'file' field".into()))
}

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.icons.load(&filename).await?;
    Ok((
        [(header::CONTENT_TYPE, icon_storage::content_type(&filename))],
        bytes,
    ))
}
