//! Content-based image format detection.
//!
//! Files are classified from their leading bytes only; the file extension is
//! never consulted.

use crate::constants::SNIFF_LEN;
use crate::error::{Result, StampError};
use image::{ImageError, ImageFormat};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const MIME_JPEG: &str = "image/jpeg";
const MIME_PNG: &str = "image/png";
const MIME_TEXT: &str = "text/plain; charset=utf-8";
const MIME_BINARY: &str = "application/octet-stream";

/// Image kinds the compositor can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    /// JPEG, re-encoded lossily at the configured quality
    Jpeg,
    /// PNG, re-encoded losslessly
    Png,
    /// Anything else, including other image formats such as GIF or WebP
    Unsupported,
}

impl ImageKind {
    /// Map a sniffed MIME string to a kind. Case-sensitive prefix match.
    pub fn from_mime(content_type: &str) -> Self {
        if content_type.starts_with(MIME_JPEG) {
            ImageKind::Jpeg
        } else if content_type.starts_with(MIME_PNG) {
            ImageKind::Png
        } else {
            ImageKind::Unsupported
        }
    }

    /// The codec used to decode and encode this kind.
    pub fn image_format(&self) -> Option<ImageFormat> {
        match self {
            ImageKind::Jpeg => Some(ImageFormat::Jpeg),
            ImageKind::Png => Some(ImageFormat::Png),
            ImageKind::Unsupported => None,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, ImageKind::Unsupported)
    }
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageKind::Jpeg => "JPEG",
            ImageKind::Png => "PNG",
            ImageKind::Unsupported => "unsupported",
        };
        write!(f, "{}", name)
    }
}

/// Result of sniffing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SniffedContent {
    pub content_type: String,
    pub kind: ImageKind,
}

/// Classify a byte prefix into a MIME string.
///
/// Returns `Err` only when the classifier itself fails; an unrecognised
/// signature is a successful answer (`text/plain` or `application/octet-stream`).
pub fn detect_content_type(bytes: &[u8]) -> std::result::Result<String, ImageError> {
    match image::guess_format(bytes) {
        Ok(format) => Ok(format.to_mime_type().to_string()),
        Err(ImageError::Unsupported(_)) => Ok(fallback_content_type(bytes).to_string()),
        Err(e) => Err(e),
    }
}

fn fallback_content_type(bytes: &[u8]) -> &'static str {
    let binary = bytes
        .iter()
        .any(|&b| matches!(b, 0x00..=0x08 | 0x0B | 0x0E..=0x1A | 0x1C..=0x1F));
    if binary {
        MIME_BINARY
    } else {
        MIME_TEXT
    }
}

/// Read up to the first 512 bytes of `path` and classify them.
///
/// # Errors
/// * `StampError::Io` if the file cannot be opened or read, or is empty
/// * `StampError::Validation` if the classifier fails
pub fn sniff_file(path: &Path) -> Result<SniffedContent> {
    let file = File::open(path).map_err(|e| StampError::io(path, e))?;

    let mut buf = Vec::with_capacity(SNIFF_LEN as usize);
    file.take(SNIFF_LEN)
        .read_to_end(&mut buf)
        .map_err(|e| StampError::io(path, e))?;

    if buf.is_empty() {
        return Err(StampError::io(
            path,
            io::Error::new(io::ErrorKind::UnexpectedEof, "file is empty"),
        ));
    }

    let content_type = detect_content_type(&buf).map_err(|source| StampError::Validation {
        path: path.to_path_buf(),
        source,
    })?;
    let kind = ImageKind::from_mime(&content_type);

    Ok(SniffedContent { content_type, kind })
}
