use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use rand::Rng;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

/// POST /api/uploads/transports
///
/// Accepts a single multipart field named "file" and stores it under the
/// upload directory. Names are timestamp plus a random suffix plus the
/// original extension lower-cased; collisions are not expected, content is
/// not inspected.
pub async fn transports(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let ext = Path::new(&original_name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let file_name = format!(
            "{}-{}{}",
            chrono::Utc::now().timestamp_millis(),
            rand::thread_rng().gen_range(0u32..1_000_000_000),
            ext
        );

        let dir = Path::new(&state.config.upload_dir).join("transports");
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(dir.join(&file_name), &data)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        return Ok(Json(UploadResponse {
            url: format!("/uploads/transports/{}", file_name),
        }));
    }

    Err(AppError::BadRequest("Файл не загружен".to_string()))
}
