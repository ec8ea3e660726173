//! Transformation options passed to the storage service at upload time.

use crate::models::MediaKind;
use serde::{Deserialize, Serialize};

/// Output container/format requested from the transform service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    Auto,
    Mp4,
    Jpg,
}

/// Quality setting; explicit values are clamped to 1..=100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Auto,
    Explicit(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Crop {
    None,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gravity {
    None,
    Auto,
}

/// Upload-time transformation applied by the storage service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    pub target_format: TargetFormat,
    pub quality: Quality,
    pub crop: Crop,
    pub gravity: Gravity,
}

impl TransformOptions {
    /// Default transformation for a media kind: videos are re-encoded to mp4, images keep
    /// their format; both use automatic quality.
    pub fn for_kind(kind: MediaKind) -> Self {
        let target_format = match kind {
            MediaKind::Video => TargetFormat::Mp4,
            MediaKind::Image => TargetFormat::Auto,
        };
        Self {
            target_format,
            quality: Quality::Auto,
            crop: Crop::None,
            gravity: Gravity::None,
        }
    }

    /// Encode as a comma-separated transformation string, e.g. `q_auto,f_mp4`.
    ///
    /// Components are emitted in a fixed order so the same options always produce the same
    /// string (the string takes part in request signing).
    pub fn to_transformation(&self) -> String {
        let mut parts = Vec::with_capacity(4);

        match self.crop {
            Crop::Fill => parts.push("c_fill".to_string()),
            Crop::None => {}
        }
        match self.gravity {
            Gravity::Auto => parts.push("g_auto".to_string()),
            Gravity::None => {}
        }
        match self.quality {
            Quality::Auto => parts.push("q_auto".to_string()),
            Quality::Explicit(q) => parts.push(format!("q_{}", q.clamp(1, 100))),
        }
        match self.target_format {
            TargetFormat::Auto => parts.push("f_auto".to_string()),
            TargetFormat::Mp4 => parts.push("f_mp4".to_string()),
            TargetFormat::Jpg => parts.push("f_jpg".to_string()),
        }

        parts.join(",")
    }
}
