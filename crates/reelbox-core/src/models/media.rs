use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "media_kind", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Resource type segment used by the storage and delivery services.
    pub fn resource_type(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// Folder the uploads of this kind are grouped under.
    pub fn upload_folder(&self) -> &'static str {
        match self {
            MediaKind::Image => "image-upload",
            MediaKind::Video => "video-upload",
        }
    }

    /// Whether a client-declared content type is acceptable for this kind.
    ///
    /// `application/octet-stream` is accepted because browsers send it for files they
    /// cannot classify.
    pub fn accepts_content_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if essence == "application/octet-stream" {
            return true;
        }
        essence.starts_with(&format!("{}/", self.resource_type()))
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.resource_type())
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            other => Err(AppError::Validation(format!(
                "Unrecognized media kind: {}",
                other
            ))),
        }
    }
}

/// A committed media record. Never mutated after insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct MediaRecord {
    pub id: Uuid,
    pub kind: MediaKind,
    pub asset_ref: String,
    pub title: String,
    pub description: Option<String>,
    pub original_size_bytes: i64,
    pub derived_size_bytes: i64,
    pub duration_seconds: f64,
    pub created_at: DateTime<Utc>,
}

impl MediaRecord {
    /// `1 - derived/original`. Negative when the transform made the file larger.
    pub fn compression_ratio(&self) -> f64 {
        compression_ratio(self.original_size_bytes, self.derived_size_bytes)
    }

    /// Compression ratio as a rounded percentage.
    pub fn compression_percent(&self) -> i64 {
        (self.compression_ratio() * 100.0).round() as i64
    }
}

/// Record contents before the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMediaRecord {
    pub kind: MediaKind,
    pub asset_ref: String,
    pub title: String,
    pub description: Option<String>,
    pub original_size_bytes: i64,
    pub derived_size_bytes: i64,
    pub duration_seconds: f64,
}

impl NewMediaRecord {
    /// Check the record invariants every store enforces before insert.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.asset_ref.trim().is_empty() {
            return Err(AppError::Validation("asset reference is required".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title is required".to_string()));
        }
        if self.original_size_bytes <= 0 {
            return Err(AppError::Validation(
                "original size must be positive".to_string(),
            ));
        }
        if self.derived_size_bytes <= 0 {
            return Err(AppError::Validation(
                "derived size must be positive".to_string(),
            ));
        }
        if !self.duration_seconds.is_finite() || self.duration_seconds < 0.0 {
            return Err(AppError::Validation(
                "duration must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    /// Materialize the record with store-assigned identity and commit time.
    pub fn into_record(self, id: Uuid, created_at: DateTime<Utc>) -> MediaRecord {
        MediaRecord {
            id,
            kind: self.kind,
            asset_ref: self.asset_ref,
            title: self.title,
            description: self.description,
            original_size_bytes: self.original_size_bytes,
            derived_size_bytes: self.derived_size_bytes,
            duration_seconds: self.duration_seconds,
            created_at,
        }
    }
}

pub fn compression_ratio(original_size_bytes: i64, derived_size_bytes: i64) -> f64 {
    if original_size_bytes <= 0 {
        return 0.0;
    }
    1.0 - derived_size_bytes as f64 / original_size_bytes as f64
}

/// Human-readable size, 1024-based: `"10 MB"`, `"1.5 KB"`.
pub fn format_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes <= 0 {
        return "0 B".to_string();
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Duration as `m:ss`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_record() -> NewMediaRecord {
        NewMediaRecord {
            kind: MediaKind::Video,
            asset_ref: "reelbox/video-upload/abc".to_string(),
            title: "demo".to_string(),
            description: None,
            original_size_bytes: 10_485_760,
            derived_size_bytes: 2_097_152,
            duration_seconds: 12.5,
        }
    }

    #[test]
    fn test_media_kind_from_str() {
        assert_eq!("video".parse::<MediaKind>().unwrap(), MediaKind::Video);
        assert_eq!(" IMAGE ".parse::<MediaKind>().unwrap(), MediaKind::Image);
        let err = "audio".parse::<MediaKind>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_accepts_content_type() {
        assert!(MediaKind::Video.accepts_content_type("video/mp4"));
        assert!(MediaKind::Video.accepts_content_type("Video/QuickTime; codecs=x"));
        assert!(MediaKind::Video.accepts_content_type("application/octet-stream"));
        assert!(!MediaKind::Video.accepts_content_type("image/png"));
        assert!(MediaKind::Image.accepts_content_type("image/png"));
    }

    #[test]
    fn test_compression_ratio_tolerates_expansion() {
        assert!((compression_ratio(100, 80) - 0.2).abs() < f64::EPSILON);
        assert!(compression_ratio(100, 150) < 0.0);

        let mut record = new_record().into_record(Uuid::new_v4(), Utc::now());
        assert_eq!(record.compression_percent(), 80);
        record.derived_size_bytes = 15_728_640;
        assert_eq!(record.compression_percent(), -50);
    }

    #[test]
    fn test_check_invariants() {
        assert!(new_record().check_invariants().is_ok());

        let mut zero_derived = new_record();
        zero_derived.derived_size_bytes = 0;
        assert!(zero_derived.check_invariants().is_err());

        let mut negative_duration = new_record();
        negative_duration.duration_seconds = -1.0;
        assert!(negative_duration.check_invariants().is_err());

        let mut blank_title = new_record();
        blank_title.title = "   ".to_string();
        assert!(blank_title.check_invariants().is_err());
    }

    #[test]
    fn test_format_helpers() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(10_485_760), "10 MB");
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(75.4), "1:15");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = new_record().into_record(Uuid::nil(), Utc::now());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["assetRef"], "reelbox/video-upload/abc");
        assert_eq!(json["originalSizeBytes"], 10_485_760);
        assert_eq!(json["kind"], "video");
    }
}
