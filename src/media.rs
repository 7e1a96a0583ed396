//! Storage for uploaded post images.

use std::path::Path;

use anyhow::Context;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Subdirectory of the media root that post images are written to.
pub const POSTS_SUBDIR: &str = "posts";

/// Largest request body accepted by the post create/edit forms.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["gif", "jpg", "jpeg", "png", "webp"];

/// Detect the image format from its leading bytes.
#[must_use]
pub fn sniff_image_format(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("gif")
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("jpeg")
    } else if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("webp")
    } else {
        None
    }
}

/// Lower-cased extension of an uploaded file name, if it is an allowed one.
fn allowed_extension(filename: &str) -> Option<String> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Validate an upload and write it under `<media_dir>/posts/`.
///
/// Returns the path relative to the media root (e.g. `posts/Ab12....gif`),
/// which is what gets stored on the post.
pub async fn save_post_image(media_dir: &Path, filename: &str, bytes: &[u8]) -> AppResult<String> {
    let invalid = || {
        AppError::validation(
            "image",
            "Upload a valid image. The file you uploaded was either not an image or a corrupted image.",
        )
    };

    let ext = allowed_extension(filename).ok_or_else(invalid)?;
    sniff_image_format(bytes).ok_or_else(invalid)?;

    let token: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    let relative = format!("{POSTS_SUBDIR}/{token}.{ext}");

    let dir = media_dir.join(POSTS_SUBDIR);
    tokio::fs::create_dir_all(&dir)
        .await
        .with_context(|| format!("Failed to create media directory: {}", dir.display()))?;

    let path = media_dir.join(&relative);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("Failed to write image: {}", path.display()))?;

    debug!(path = %path.display(), size = bytes.len(), "Saved post image");
    Ok(relative)
}
