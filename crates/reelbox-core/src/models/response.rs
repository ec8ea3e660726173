use serde::Serialize;
use utoipa::ToSchema;

use super::media::{format_duration, format_size, MediaRecord};
use crate::delivery::DeliveryUrls;

/// Listing/upload view of a record: the stored fields plus values derived on read.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MediaRecordResponse {
    #[serde(flatten)]
    pub record: MediaRecord,
    pub compression_percent: i64,
    pub original_size_display: String,
    pub derived_size_display: String,
    pub duration_display: String,
    /// Absent when delivery URLs could not be derived for this asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery: Option<DeliveryUrls>,
}

impl MediaRecordResponse {
    pub fn new(record: MediaRecord, delivery: Option<DeliveryUrls>) -> Self {
        Self {
            compression_percent: record.compression_percent(),
            original_size_display: format_size(record.original_size_bytes),
            derived_size_display: format_size(record.derived_size_bytes),
            duration_display: format_duration(record.duration_seconds),
            delivery,
            record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, NewMediaRecord};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_response_flattens_record_fields() {
        let record = NewMediaRecord {
            kind: MediaKind::Video,
            asset_ref: "reelbox/video-upload/abc".to_string(),
            title: "demo".to_string(),
            description: None,
            original_size_bytes: 10_485_760,
            derived_size_bytes: 5_242_880,
            duration_seconds: 61.0,
        }
        .into_record(Uuid::new_v4(), Utc::now());

        let json = serde_json::to_value(MediaRecordResponse::new(record, None)).unwrap();
        assert_eq!(json["title"], "demo");
        assert_eq!(json["compressionPercent"], 50);
        assert_eq!(json["originalSizeDisplay"], "10 MB");
        assert_eq!(json["durationDisplay"], "1:01");
        assert!(json.get("delivery").is_none());
    }
}
