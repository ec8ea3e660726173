//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use reelbox_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct SessionTokenAddon;

impl Modify for SessionTokenAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelbox API",
        version = "0.1.0",
        description = "Video and image ingestion: uploads go to a remote transform/storage service, \
            records land in the metadata store, and delivery URLs are derived on read."
    ),
    modifiers(&SessionTokenAddon),
    paths(
        handlers::media_upload::upload_video,
        handlers::media_upload::upload_image,
        handlers::media_list::list_videos,
        handlers::delivery::resolve_delivery,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(
        schemas(
            models::MediaKind,
            models::MediaRecord,
            models::MediaRecordResponse,
            reelbox_core::DeliveryUrls,
            reelbox_core::SocialPreset,
            handlers::media_upload::UploadResponse,
            handlers::media_list::ListResponse,
            handlers::delivery::DeliveryResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Upload, listing and delivery of videos and images"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
