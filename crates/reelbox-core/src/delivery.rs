//! Delivery URL resolver
//!
//! Derives thumbnail, hover-preview, download and social-format URLs for a stored asset.
//! Everything here is a pure function of the asset reference and the resolver's
//! configuration: no I/O, no state, so identical inputs always yield identical URLs.
//!
//! URLs have the shape
//! `{base_url}/{cloud_name}/{resource}/upload/{transformations}/{asset_ref}[.{ext}]`.
//!
//! # Example
//!
//! ```rust
//! use reelbox_core::delivery::DeliveryResolver;
//!
//! let resolver = DeliveryResolver::new("https://res.example.com", "demo");
//! let url = resolver.thumbnail_url("reelbox/video-upload/abc").unwrap();
//! assert_eq!(
//!     url,
//!     "https://res.example.com/demo/video/upload/w_400,h_225,c_fill,g_auto,q_auto/reelbox/video-upload/abc.jpg"
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::models::{MediaKind, MediaRecord};
use crate::transform::{Crop, Gravity, Quality, TargetFormat};

const PREVIEW_BOX: (u32, u32) = (400, 225);
const FULL_RESOLUTION: (u32, u32) = (1920, 1080);
const PREVIEW_CLIP_EFFECT: &str = "preview:duration_15.0:max_seg_9:min_seg_dur_1.0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Malformed asset reference: {0}")]
    MalformedAssetRef(String),
}

impl From<DeliveryError> for AppError {
    fn from(err: DeliveryError) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Reject references that would produce an ambiguous or unsafe URL path.
pub fn validate_asset_ref(asset_ref: &str) -> Result<(), DeliveryError> {
    if asset_ref.is_empty() {
        return Err(DeliveryError::MalformedAssetRef(
            "asset reference is empty".to_string(),
        ));
    }
    if asset_ref.starts_with('/') || asset_ref.ends_with('/') || asset_ref.contains("//") {
        return Err(DeliveryError::MalformedAssetRef(format!(
            "'{}' has an empty path segment",
            asset_ref
        )));
    }
    if asset_ref.split('/').any(|segment| segment == ".." || segment == ".") {
        return Err(DeliveryError::MalformedAssetRef(format!(
            "'{}' contains a relative path segment",
            asset_ref
        )));
    }
    if let Some(c) = asset_ref
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')))
    {
        return Err(DeliveryError::MalformedAssetRef(format!(
            "'{}' contains invalid character {:?}",
            asset_ref, c
        )));
    }
    Ok(())
}

/// Fluent builder for a single delivery URL
///
/// # Example
///
/// ```rust
/// use reelbox_core::delivery::DeliveryUrlBuilder;
/// use reelbox_core::models::MediaKind;
/// use reelbox_core::transform::TargetFormat;
///
/// let url = DeliveryUrlBuilder::new(MediaKind::Video)
///     .dimensions(1920, 1080)
///     .format(TargetFormat::Mp4)
///     .build("https://res.example.com", "demo", "clips/abc")
///     .unwrap();
/// assert_eq!(url, "https://res.example.com/demo/video/upload/w_1920,h_1080/clips/abc.mp4");
/// ```
#[derive(Debug, Clone)]
pub struct DeliveryUrlBuilder {
    kind: MediaKind,
    width: Option<u32>,
    height: Option<u32>,
    crop: Crop,
    gravity: Gravity,
    quality: Option<Quality>,
    format: Option<TargetFormat>,
    effect: Option<String>,
}

impl DeliveryUrlBuilder {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            width: None,
            height: None,
            crop: Crop::None,
            gravity: Gravity::None,
            quality: None,
            format: None,
            effect: None,
        }
    }

    /// Set both width and height
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn crop(mut self, crop: Crop) -> Self {
        self.crop = crop;
        self
    }

    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn quality(mut self, quality: Quality) -> Self {
        self.quality = Some(quality);
        self
    }

    /// Output format. `Mp4`/`Jpg` become the file extension, `Auto` becomes `f_auto`.
    pub fn format(mut self, format: TargetFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Effect applied as its own transformation stage, e.g. `preview:duration_15.0`.
    pub fn effect(mut self, effect: &str) -> Self {
        self.effect = Some(effect.to_string());
        self
    }

    /// Build the transformation path segments, without base URL or asset reference.
    pub fn build_transformations(&self) -> String {
        let mut primary = Vec::new();

        if let Some(width) = self.width {
            primary.push(format!("w_{}", width));
        }
        if let Some(height) = self.height {
            primary.push(format!("h_{}", height));
        }
        if self.crop == Crop::Fill {
            primary.push("c_fill".to_string());
        }
        if self.gravity == Gravity::Auto {
            primary.push("g_auto".to_string());
        }
        match self.quality {
            Some(Quality::Auto) => primary.push("q_auto".to_string()),
            Some(Quality::Explicit(q)) => primary.push(format!("q_{}", q.clamp(1, 100))),
            None => {}
        }
        if self.format == Some(TargetFormat::Auto) {
            primary.push("f_auto".to_string());
        }

        let mut stages = Vec::new();
        if !primary.is_empty() {
            stages.push(primary.join(","));
        }
        if let Some(effect) = &self.effect {
            stages.push(format!("e_{}", effect));
        }
        stages.join("/")
    }

    fn extension(&self) -> Option<&'static str> {
        match self.format {
            Some(TargetFormat::Mp4) => Some("mp4"),
            Some(TargetFormat::Jpg) => Some("jpg"),
            Some(TargetFormat::Auto) | None => None,
        }
    }

    /// Build the full URL for `asset_ref`.
    pub fn build(
        &self,
        base_url: &str,
        cloud_name: &str,
        asset_ref: &str,
    ) -> Result<String, DeliveryError> {
        validate_asset_ref(asset_ref)?;

        let mut url = base_url.trim_end_matches('/').to_string();
        if !cloud_name.is_empty() {
            url.push('/');
            url.push_str(cloud_name);
        }
        url.push('/');
        url.push_str(self.kind.resource_type());
        url.push_str("/upload/");

        let transformations = self.build_transformations();
        if !transformations.is_empty() {
            url.push_str(&transformations);
            url.push('/');
        }
        url.push_str(asset_ref);
        if let Some(ext) = self.extension() {
            url.push('.');
            url.push_str(ext);
        }
        Ok(url)
    }
}

/// Social-share output sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SocialPreset {
    InstagramSquare,
    InstagramPortrait,
    TwitterPost,
    TwitterHeader,
    FacebookCover,
}

impl SocialPreset {
    pub const ALL: [SocialPreset; 5] = [
        SocialPreset::InstagramSquare,
        SocialPreset::InstagramPortrait,
        SocialPreset::TwitterPost,
        SocialPreset::TwitterHeader,
        SocialPreset::FacebookCover,
    ];

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            SocialPreset::InstagramSquare => (1080, 1080),
            SocialPreset::InstagramPortrait => (1080, 1350),
            SocialPreset::TwitterPost => (1200, 675),
            SocialPreset::TwitterHeader => (1500, 500),
            SocialPreset::FacebookCover => (820, 312),
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            SocialPreset::InstagramSquare => "instagram-square",
            SocialPreset::InstagramPortrait => "instagram-portrait",
            SocialPreset::TwitterPost => "twitter-post",
            SocialPreset::TwitterHeader => "twitter-header",
            SocialPreset::FacebookCover => "facebook-cover",
        }
    }
}

impl Display for SocialPreset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for SocialPreset {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SocialPreset::ALL
            .into_iter()
            .find(|preset| preset.slug() == s.trim().to_lowercase())
            .ok_or_else(|| AppError::Validation(format!("Unknown social format: {}", s)))
    }
}

/// URLs derived for one asset
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryUrls {
    pub thumbnail_url: String,
    /// Short hover preview; videos only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
    pub download_url: String,
}

/// Stateless resolver bound to a delivery host and account.
#[derive(Debug, Clone)]
pub struct DeliveryResolver {
    base_url: String,
    cloud_name: String,
}

impl DeliveryResolver {
    pub fn new(base_url: impl Into<String>, cloud_name: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cloud_name: cloud_name.into(),
        }
    }

    fn build(&self, builder: DeliveryUrlBuilder, asset_ref: &str) -> Result<String, DeliveryError> {
        builder.build(&self.base_url, &self.cloud_name, asset_ref)
    }

    fn thumbnail_builder(kind: MediaKind) -> DeliveryUrlBuilder {
        let format = match kind {
            MediaKind::Video => TargetFormat::Jpg,
            MediaKind::Image => TargetFormat::Auto,
        };
        DeliveryUrlBuilder::new(kind)
            .dimensions(PREVIEW_BOX.0, PREVIEW_BOX.1)
            .crop(Crop::Fill)
            .gravity(Gravity::Auto)
            .quality(Quality::Auto)
            .format(format)
    }

    /// Still frame of a video, filled into the fixed preview box.
    pub fn thumbnail_url(&self, asset_ref: &str) -> Result<String, DeliveryError> {
        self.build(Self::thumbnail_builder(MediaKind::Video), asset_ref)
    }

    /// Bounded-length preview clip for hover playback.
    pub fn preview_clip_url(&self, asset_ref: &str) -> Result<String, DeliveryError> {
        let builder = DeliveryUrlBuilder::new(MediaKind::Video)
            .dimensions(PREVIEW_BOX.0, PREVIEW_BOX.1)
            .effect(PREVIEW_CLIP_EFFECT)
            .format(TargetFormat::Mp4);
        self.build(builder, asset_ref)
    }

    /// Full-resolution video for download.
    pub fn full_delivery_url(&self, asset_ref: &str) -> Result<String, DeliveryError> {
        let builder = DeliveryUrlBuilder::new(MediaKind::Video)
            .dimensions(FULL_RESOLUTION.0, FULL_RESOLUTION.1)
            .format(TargetFormat::Mp4);
        self.build(builder, asset_ref)
    }

    /// Image cropped to a social-network format.
    pub fn social_image_url(
        &self,
        asset_ref: &str,
        preset: SocialPreset,
    ) -> Result<String, DeliveryError> {
        let (width, height) = preset.dimensions();
        let builder = DeliveryUrlBuilder::new(MediaKind::Image)
            .dimensions(width, height)
            .crop(Crop::Fill)
            .gravity(Gravity::Auto);
        self.build(builder, asset_ref)
    }

    /// All URLs for an asset of the given kind.
    pub fn urls_for(&self, kind: MediaKind, asset_ref: &str) -> Result<DeliveryUrls, DeliveryError> {
        match kind {
            MediaKind::Video => Ok(DeliveryUrls {
                thumbnail_url: self.thumbnail_url(asset_ref)?,
                preview_url: Some(self.preview_clip_url(asset_ref)?),
                download_url: self.full_delivery_url(asset_ref)?,
            }),
            MediaKind::Image => Ok(DeliveryUrls {
                thumbnail_url: self.build(Self::thumbnail_builder(MediaKind::Image), asset_ref)?,
                preview_url: None,
                download_url: self.build(
                    DeliveryUrlBuilder::new(MediaKind::Image).quality(Quality::Auto),
                    asset_ref,
                )?,
            }),
        }
    }

    pub fn urls_for_record(&self, record: &MediaRecord) -> Result<DeliveryUrls, DeliveryError> {
        self.urls_for(record.kind, &record.asset_ref)
    }
}
