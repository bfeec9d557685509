//! Reads a local image file into an upload payload.

use std::path::Path;

use snacksy_core::error::{Result, SnacksyError};
use snacksy_core::image::ImageUpload;

/// Reads `path` and guesses its MIME type from the extension.
pub async fn load_image(path: &Path) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        SnacksyError::io(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    if !content_type.starts_with("image/") {
        tracing::warn!(
            "[ImageLoader] {} does not look like an image ({})",
            path.display(),
            content_type
        );
    }

    Ok(ImageUpload::new(file_name, content_type, bytes))
}
