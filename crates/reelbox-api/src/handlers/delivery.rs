use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use reelbox_core::models::MediaKind;
use reelbox_core::{DeliveryUrls, SocialPreset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(rename_all = "camelCase")]
pub struct DeliveryQuery {
    /// Asset reference returned at upload time
    pub asset_ref: String,
    /// `video` or `image`
    pub kind: String,
    /// Social-share format slug, e.g. `instagram-square`
    pub social: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryResponse {
    pub success: bool,
    pub message: String,
    pub asset_ref: String,
    pub kind: MediaKind,
    pub urls: DeliveryUrls,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_image_url: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/delivery",
    tag = "media",
    params(DeliveryQuery),
    responses(
        (status = 200, description = "Delivery URLs for the asset", body = DeliveryResponse),
        (status = 400, description = "Malformed asset reference, kind or format", body = ErrorResponse),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    )
)]
pub async fn resolve_delivery(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DeliveryQuery>, QueryRejection>,
) -> Result<Json<DeliveryResponse>, HttpAppError> {
    let Query(query) = query?;
    let kind = MediaKind::from_str(&query.kind)?;

    let urls = state.delivery.urls_for(kind, &query.asset_ref)?;

    let social_image_url = match query.social.as_deref() {
        Some(slug) => {
            let preset = SocialPreset::from_str(slug)?;
            Some(state.delivery.social_image_url(&query.asset_ref, preset)?)
        }
        None => None,
    };

    Ok(Json(DeliveryResponse {
        success: true,
        message: "Delivery URLs resolved".to_string(),
        asset_ref: query.asset_ref,
        kind,
        urls,
        social_image_url,
    }))
}
