use crate::error::{ImageRole, Result, StampError};
use crate::formats::{sniff_file, ImageKind};
use std::path::Path;

/// Sniff `path` and require it to be JPEG or PNG.
///
/// The returned kind is never `ImageKind::Unsupported`.
pub fn validate_image(path: &Path, role: ImageRole) -> Result<ImageKind> {
    let sniffed = sniff_file(path)?;

    if !sniffed.kind.is_supported() {
        return Err(StampError::UnsupportedFormat {
            path: path.to_path_buf(),
            role,
            content_type: sniffed.content_type,
        });
    }

    Ok(sniffed.kind)
}
