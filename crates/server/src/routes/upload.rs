//! Product image uploads.
//!
//! Files land under `{upload_dir}/products` and are served back at
//! `/uploads/products/{filename}`. Only image content types are accepted.

use std::path::Path as FsPath;

use axum::extract::State;
use axum::extract::multipart::{Field, Multipart};
use axum::routing::post;
use axum::{Json, Router};
use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Maximum number of files per batch upload.
const MAX_FILES: usize = 5;

/// Per-file size cap: 5 MiB.
const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/single", post(single))
        .route("/multiple", post(multiple))
}

#[derive(Debug, Serialize)]
struct SavedFile {
    filename: String,
    path: String,
}

#[derive(Debug, Serialize)]
struct SingleUploadResponse {
    message: String,
    filename: String,
    path: String,
}

#[derive(Debug, Serialize)]
struct MultipleUploadResponse {
    message: String,
    files: Vec<SavedFile>,
}

async fn single(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<SingleUploadResponse>> {
    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() != Some("image") {
            continue;
        }
        let saved = save_image(&state, field).await?;
        return Ok(Json(SingleUploadResponse {
            message: "File uploaded successfully".to_string(),
            filename: saved.filename,
            path: saved.path,
        }));
    }

    Err(ApiError::Validation("No file uploaded".to_string()))
}

async fn multiple(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> Result<Json<MultipleUploadResponse>> {
    let mut files = Vec::new();

    while let Some(field) = next_field(&mut multipart).await? {
        if field.name() != Some("images") {
            continue;
        }
        if files.len() == MAX_FILES {
            return Err(ApiError::Validation(format!(
                "At most {MAX_FILES} files per upload"
            )));
        }
        files.push(save_image(&state, field).await?);
    }

    if files.is_empty() {
        return Err(ApiError::Validation("No files uploaded".to_string()));
    }

    Ok(Json(MultipleUploadResponse {
        message: "Files uploaded successfully".to_string(),
        files,
    }))
}

async fn next_field(multipart: &mut Multipart) -> Result<Option<Field<'_>>> {
    multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Invalid multipart body: {e}")))
}

/// Persist one uploaded image and return its public path.
async fn save_image(state: &AppState, field: Field<'_>) -> Result<SavedFile> {
    let content_type = field.content_type().unwrap_or_default().to_string();
    if !content_type.starts_with("image/") {
        return Err(ApiError::Validation(
            "Only image files are allowed".to_string(),
        ));
    }

    let field_name = field.name().unwrap_or("image").to_string();
    let extension = field
        .file_name()
        .and_then(|name| FsPath::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::Validation(format!("Failed to read upload: {e}")))?;

    if bytes.len() > MAX_FILE_BYTES {
        return Err(ApiError::Validation(
            "File too large (5 MiB maximum)".to_string(),
        ));
    }

    let filename = unique_filename(&field_name, &extension);

    let dir = state.config().product_upload_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to create upload dir: {e}")))?;
    tokio::fs::write(dir.join(&filename), &bytes)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to write upload: {e}")))?;

    info!(filename = %filename, size = bytes.len(), "Image uploaded");

    Ok(SavedFile {
        path: format!("/uploads/products/{filename}"),
        filename,
    })
}

/// Collision-resistant name: field, timestamp, and a random suffix.
fn unique_filename(field_name: &str, extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);
    format!("{field_name}-{millis}-{suffix}{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_keep_the_extension() {
        let name = unique_filename("image", ".png");
        assert!(name.starts_with("image-"));
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn filenames_are_unique() {
        let a = unique_filename("images", ".jpg");
        let b = unique_filename("images", ".jpg");
        assert_ne!(a, b);
    }
}
