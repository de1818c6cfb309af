/// Utility functions shared by the path and batch modules.
use crate::error::{Result, StampError};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

/// Stat a path, treating "not found" as a normal answer rather than an error.
///
/// # Returns
/// * `Ok(Some(metadata))` if the path exists
/// * `Ok(None)` if it does not
/// * `Err(StampError::Io)` for any other stat failure (permissions, bad component, ...)
pub fn stat_if_exists(path: &Path) -> Result<Option<Metadata>> {
    match fs::metadata(path) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StampError::io(path, e)),
    }
}

/// Format file size in human-readable format
///
/// # Arguments
/// * `bytes` - Size in bytes
///
/// # Returns
/// * Human-readable size string (e.g., "1.2 MB", "512 B")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1024.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}
