use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two inputs of a composition an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Main,
    Watermark,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRole::Main => write!(f, "main"),
            ImageRole::Watermark => write!(f, "watermark"),
        }
    }
}

#[derive(Debug, Error)]
pub enum StampError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to check the content type of {path}: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(
        "The {role} image {path} has an unsupported format. \
         (Supported formats: jpg, jpeg, png - Entered file format: {content_type})"
    )]
    UnsupportedFormat {
        path: PathBuf,
        role: ImageRole,
        content_type: String,
    },

    #[error("Failed to decode {role} image {path}: {source}")]
    Decode {
        path: PathBuf,
        role: ImageRole,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to encode output image {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("PNG optimization error on {path}: {message}")]
    PngOptimization { path: PathBuf, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted before all files were processed")]
    Interrupted,

    #[error("{failed} of {total} files failed to process")]
    BatchFailed { failed: usize, total: usize },
}

impl StampError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StampError::Io {
            path: path.into(),
            source,
        }
    }

    /// The file the error is about, when there is one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            StampError::Io { path, .. }
            | StampError::Validation { path, .. }
            | StampError::UnsupportedFormat { path, .. }
            | StampError::Decode { path, .. }
            | StampError::Encode { path, .. }
            | StampError::PngOptimization { path, .. } => Some(path),
            StampError::Config(_) | StampError::Interrupted | StampError::BatchFailed { .. } => {
                None
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, StampError>;
