//! Target expansion and output path resolution.

use crate::constants::STAMPED_PREFIX;
use crate::error::{Result, StampError};
use crate::utils::stat_if_exists;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One entry produced by [`expand_target`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Something to stamp. Not necessarily an image; that is decided by sniffing.
    File(PathBuf),
    /// A subdirectory of the target directory. Never descended into.
    Directory(PathBuf),
}

impl Candidate {
    pub fn path(&self) -> &Path {
        match self {
            Candidate::File(path) | Candidate::Directory(path) => path,
        }
    }
}

/// Turn the user's target into the list of candidates to process.
///
/// A regular file yields itself. A directory yields its immediate entries in
/// the order the filesystem lists them; no sorting and no recursion.
///
/// # Errors
/// * `StampError::Io` if the target does not exist or cannot be listed
pub fn expand_target(target: &Path) -> Result<Vec<Candidate>> {
    let target = std::path::absolute(target).map_err(|e| StampError::io(target, e))?;
    let metadata = fs::metadata(&target).map_err(|e| StampError::io(&target, e))?;

    if !metadata.is_dir() {
        return Ok(vec![Candidate::File(target)]);
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(&target).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(&target).to_path_buf();
            StampError::io(path, io::Error::from(e))
        })?;

        let path = entry.path().to_path_buf();
        if entry.file_type().is_dir() {
            candidates.push(Candidate::Directory(path));
        } else {
            candidates.push(Candidate::File(path));
        }
    }

    Ok(candidates)
}

fn stamped_name(source: &Path) -> Result<OsString> {
    let base = source.file_name().ok_or_else(|| {
        StampError::io(
            source,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;

    let mut name = OsString::from(STAMPED_PREFIX);
    name.push(base);
    Ok(name)
}

/// Work out where the stamped copy of `source` is written.
///
/// * no suggestion: `stamped_<name>` relative to the working directory
/// * suggestion missing on disk: the suggestion, verbatim
/// * suggestion is a directory: `<suggestion>/stamped_<name>`
/// * suggestion is a file: `<parent of suggestion>/stamped_<name>`
///
/// Existence is checked on every call. Within one batch, the first file
/// written to a missing suggestion creates it, so later files land beside it.
pub fn resolve_output_path(suggested: Option<&Path>, source: &Path) -> Result<PathBuf> {
    let suggested = match suggested.filter(|p| !p.as_os_str().is_empty()) {
        Some(path) => path,
        None => return Ok(PathBuf::from(stamped_name(source)?)),
    };

    match stat_if_exists(suggested)? {
        None => Ok(suggested.to_path_buf()),
        Some(metadata) if metadata.is_dir() => Ok(suggested.join(stamped_name(source)?)),
        Some(_) => {
            let parent = suggested.parent().unwrap_or_else(|| Path::new(""));
            Ok(parent.join(stamped_name(source)?))
        }
    }
}
