use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use reelbox_core::models::{MediaKind, MediaRecordResponse};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Only return records of this kind
    pub kind: Option<MediaKind>,
}

/// Listing envelope
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    pub message: String,
    pub records: Vec<MediaRecordResponse>,
}

#[utoipa::path(
    get,
    path = "/api/videos",
    tag = "media",
    params(ListQuery),
    responses(
        (status = 200, description = "All records, newest first", body = ListResponse),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 500, description = "Metadata store failure", body = ErrorResponse)
    )
)]
pub async fn list_videos(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<ListResponse>, HttpAppError> {
    let Query(query) = query?;

    let records: Vec<MediaRecordResponse> = state
        .store
        .list_all()
        .await?
        .into_iter()
        .filter(|record| query.kind.map_or(true, |kind| record.kind == kind))
        .map(|record| {
            let delivery = state.delivery.urls_for_record(&record).ok();
            MediaRecordResponse::new(record, delivery)
        })
        .collect();

    let message = if records.is_empty() {
        "No media uploaded yet".to_string()
    } else {
        format!("Fetched {} records", records.len())
    };

    Ok(Json(ListResponse {
        success: true,
        message,
        records,
    }))
}
