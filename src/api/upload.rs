//! Upload API endpoints
//!
//! Handles image uploads into the local uploads tree, one subdirectory per
//! content type:
//! - POST /api/upload/{target} - Upload a file (admin, multipart field "image")
//! - DELETE /api/upload/{target}/{filename} - Delete an uploaded file (admin)
//!
//! The uploads tree itself is served statically under /uploads.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::StatusMessage;

/// Subdirectories a file may be uploaded into
const UPLOAD_TARGETS: [&str; 7] = [
    "partners",
    "newsletters",
    "news",
    "projects",
    "staff",
    "ebooks",
    "assets",
];

/// Uploaded file description
#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub filename: String,
    pub url: String,
    pub mimetype: String,
    pub size: u64,
}

/// Response for a successful upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub data: UploadedFile,
}

fn validate_target(target: &str) -> Result<(), ApiError> {
    if UPLOAD_TARGETS.contains(&target) {
        Ok(())
    } else {
        Err(ApiError::not_found(format!(
            "Unknown upload target: {}",
            target
        )))
    }
}

/// Reject filenames that could escape the uploads tree
fn validate_filename(filename: &str) -> Result<(), ApiError> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        Err(ApiError::validation_error("Invalid filename"))
    } else {
        Ok(())
    }
}

/// Pick a file extension from the original filename, falling back to the
/// MIME type
fn pick_extension(filename: &str, content_type: &str) -> String {
    if let Some((_, ext)) = filename.rsplit_once('.') {
        if !ext.is_empty() && ext.len() < 10 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return ext.to_lowercase();
        }
    }

    match content_type {
        "image/jpeg" => "jpg".to_string(),
        "image/png" => "png".to_string(),
        "image/gif" => "gif".to_string(),
        "image/webp" => "webp".to_string(),
        "image/svg+xml" => "svg".to_string(),
        _ => "bin".to_string(),
    }
}

/// Ensure a directory exists
async fn ensure_dir(path: &PathBuf) -> Result<(), ApiError> {
    if !path.exists() {
        fs::create_dir_all(path)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to create upload dir: {}", e)))?;
    }
    Ok(())
}

/// POST /api/upload/{target} - Upload an image (admin)
pub async fn upload_file(
    State(state): State<AppState>,
    Path(target): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    validate_target(&target)?;

    let config = &state.config.upload;
    let target_dir = config.path.join(&target);
    ensure_dir(&target_dir).await?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation_error(format!("Failed to read multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name != "image" {
            continue;
        }

        let original_filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        if !config.is_type_allowed(&content_type) {
            return Err(ApiError::validation_error(format!(
                "File type not allowed: {}. Accepted types: {}",
                content_type,
                config.allowed_types.join(", ")
            )));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation_error(format!("Failed to read file: {}", e)))?;

        if data.len() as u64 > config.max_file_size {
            return Err(ApiError::validation_error(format!(
                "File too large. Maximum size: {}MB",
                config.max_file_size / 1024 / 1024
            )));
        }

        let ext = pick_extension(&original_filename, &content_type);
        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        let file_path = target_dir.join(&filename);

        fs::write(&file_path, &data)
            .await
            .map_err(|e| ApiError::internal_error(format!("Failed to save file: {}", e)))?;

        tracing::info!("File uploaded: {}/{}", target, filename);

        return Ok(Json(UploadResponse {
            success: true,
            message: "File uploaded successfully".to_string(),
            data: UploadedFile {
                url: format!("/uploads/{}/{}", target, filename),
                filename,
                mimetype: content_type,
                size: data.len() as u64,
            },
        }));
    }

    Err(ApiError::validation_error("No file provided"))
}

/// DELETE /api/upload/{target}/{filename} - Delete an uploaded file (admin)
pub async fn delete_file(
    State(state): State<AppState>,
    Path((target, filename)): Path<(String, String)>,
) -> Result<Json<StatusMessage>, ApiError> {
    validate_target(&target)?;
    validate_filename(&filename)?;

    let file_path = state.config.upload.path.join(&target).join(&filename);

    match fs::remove_file(&file_path).await {
        Ok(()) => {
            tracing::info!("File deleted: {}/{}", target, filename);
            Ok(Json(StatusMessage::ok("File deleted successfully")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ApiError::not_found("File not found"))
        }
        Err(e) => Err(ApiError::internal_error(format!(
            "Failed to delete file: {}",
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_target() {
        for target in UPLOAD_TARGETS {
            assert!(validate_target(target).is_ok());
        }
        assert!(validate_target("secrets").is_err());
        assert!(validate_target("").is_err());
    }

    #[test]
    fn test_validate_filename_rejects_traversal() {
        assert!(validate_filename("image.png").is_ok());
        assert!(validate_filename("../../etc/passwd").is_err());
        assert!(validate_filename("a/b.png").is_err());
        assert!(validate_filename("a\\b.png").is_err());
        assert!(validate_filename("").is_err());
    }

    #[test]
    fn test_pick_extension() {
        assert_eq!(pick_extension("photo.PNG", "image/png"), "png");
        assert_eq!(pick_extension("archive.tar.gz", "image/png"), "gz");
        assert_eq!(pick_extension("noext", "image/jpeg"), "jpg");
        assert_eq!(pick_extension("noext", "application/octet-stream"), "bin");
        // A suspicious extension falls back to the MIME type
        assert_eq!(pick_extension("weird.<script>", "image/webp"), "webp");
    }
}
