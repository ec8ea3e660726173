use crate::auth::AuthSubject;
use crate::error::{ErrorResponse, HttpAppError};
use crate::services::ingest::IngestRequest;
use crate::state::AppState;
use crate::utils::upload::{extract_upload_form, UploadForm};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use reelbox_core::models::{MediaKind, MediaRecordResponse};
use reelbox_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// Upload success envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<MediaRecordResponse>,
}

#[utoipa::path(
    post,
    path = "/api/video-upload",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: file (binary), title, description (optional), declaredOriginalSize"),
    responses(
        (status = 200, description = "Video uploaded and recorded", body = UploadResponse),
        (status = 400, description = "Invalid input or file too large", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 422, description = "Storage service rejected the file", body = ErrorResponse),
        (status = 500, description = "Storage or metadata failure", body = ErrorResponse),
        (status = 502, description = "Storage service failure", body = ErrorResponse),
        (status = 504, description = "Storage service timed out", body = ErrorResponse)
    )
)]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    subject: AuthSubject,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = extract_upload_form(multipart?).await?;

    let declared_original_size = form.declared_size()?.ok_or_else(|| {
        AppError::Validation("declaredOriginalSize is required".to_string())
    })?;
    let title = form.title.clone().unwrap_or_default();

    ingest_form(&state, &subject, form, MediaKind::Video, title, declared_original_size).await
}

/// Image uploads from the social-share flow send only the file: the title defaults to the
/// file name and the declared size to the received byte count.
#[utoipa::path(
    post,
    path = "/api/image-upload",
    tag = "media",
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Fields: file (binary), title (optional), description (optional), declaredOriginalSize (optional)"),
    responses(
        (status = 200, description = "Image uploaded and recorded", body = UploadResponse),
        (status = 400, description = "Invalid input or file too large", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse),
        (status = 500, description = "Storage or metadata failure", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    subject: AuthSubject,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let form = extract_upload_form(multipart?).await?;

    let declared_original_size = form
        .declared_size()?
        .unwrap_or(form.bytes.len() as i64);
    let title = form
        .title
        .clone()
        .filter(|t| !t.trim().is_empty())
        .or_else(|| form.filename.clone())
        .unwrap_or_default();

    ingest_form(&state, &subject, form, MediaKind::Image, title, declared_original_size).await
}

async fn ingest_form(
    state: &AppState,
    subject: &AuthSubject,
    form: UploadForm,
    kind: MediaKind,
    title: String,
    declared_original_size: i64,
) -> Result<Json<UploadResponse>, HttpAppError> {
    tracing::info!(
        subject = %subject.subject,
        media_kind = %kind,
        size_bytes = form.bytes.len(),
        filename = ?form.filename,
        "Upload received"
    );

    let request = IngestRequest {
        bytes: form.bytes,
        kind,
        title,
        description: form.description,
        declared_original_size,
        content_type: form.content_type,
    };

    let cancel = state.request_token();
    let record = state.ingest.ingest(request, &cancel).await?;

    let delivery = match state.delivery.urls_for_record(&record) {
        Ok(urls) => Some(urls),
        Err(e) => {
            tracing::warn!(asset_ref = %record.asset_ref, error = %e, "No delivery URLs for asset");
            None
        }
    };

    let message = match kind {
        MediaKind::Video => "Video uploaded successfully",
        MediaKind::Image => "Image uploaded successfully",
    };

    Ok(Json(UploadResponse {
        success: true,
        message: message.to_string(),
        record: Some(MediaRecordResponse::new(record, delivery)),
    }))
}
