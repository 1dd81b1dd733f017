//! Handlers for admin media uploads (product photos, banner media).

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use sweetbox_core::validation::{validate_max_length, validate_one_of};

use crate::error::{AppError, AppResult};
use crate::gateways::cloudinary::{MediaUpload, RESOURCE_IMAGE, VALID_RESOURCE_TYPES};
use crate::middleware::rbac::RequireAdmin;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Upper bound for a multipart upload body.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct DestroyMedia {
    pub public_id: String,
    pub resource_type: Option<String>,
}

/// POST /api/v1/admin/media
///
/// Multipart form with a required `file` field and an optional `folder`
/// field. Responds with the hosted URL and public id.
pub async fn upload_media(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let store = state.media_store()?;

    let mut file: Option<(String, String, Vec<u8>)> = None;
    let mut folder: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            "folder" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let text = text.trim();
                if !text.is_empty() {
                    validate_max_length("folder", text, 100)?;
                    folder = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("Uploaded file is empty".into()));
    }

    let upload = MediaUpload {
        file_name,
        content_type,
        bytes,
        folder,
    };
    upload.resource_type()?;
    let uploaded = store.upload(upload).await?;

    tracing::info!(
        public_id = %uploaded.public_id,
        resource_type = %uploaded.resource_type,
        bytes = uploaded.bytes,
        admin_id = admin.user_id,
        "Media uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new("Upload complete", uploaded)),
    ))
}

/// POST /api/v1/admin/media/destroy
pub async fn destroy_media(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<DestroyMedia>,
) -> AppResult<impl IntoResponse> {
    let store = state.media_store()?;
    let public_id = input.public_id.trim();
    if public_id.is_empty() {
        return Err(AppError::BadRequest("public_id is required".into()));
    }
    let resource_type = input.resource_type.as_deref().unwrap_or(RESOURCE_IMAGE);
    validate_one_of("resource_type", resource_type, VALID_RESOURCE_TYPES)?;

    if !store.destroy(public_id, resource_type).await? {
        return Err(AppError::NotFound(format!("Media '{public_id}' not found")));
    }

    tracing::info!(public_id, admin_id = admin.user_id, "Media deleted");

    Ok(Json(ApiResponse::new(
        "Media deleted",
        json!({ "public_id": public_id }),
    )))
}
