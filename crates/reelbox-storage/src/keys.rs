//! Shared asset key layout for storage backends.
//!
//! Key format: `{root_folder}/{kind_folder}/{uuid}`, e.g. `reelbox/video-upload/6f1c…`.

use reelbox_core::models::MediaKind;
use uuid::Uuid;

/// Folder an upload of `kind` is placed in, below the configured root folder.
pub fn upload_folder(root_folder: &str, kind: MediaKind) -> String {
    let root = root_folder.trim_matches('/');
    if root.is_empty() {
        kind.upload_folder().to_string()
    } else {
        format!("{}/{}", root, kind.upload_folder())
    }
}

/// Generate a fresh asset key for an upload of `kind`.
pub fn generate_asset_key(root_folder: &str, kind: MediaKind) -> String {
    format!("{}/{}", upload_folder(root_folder, kind), Uuid::new_v4())
}
