//! Input resolution: confirm the HTML document can be handed to a renderer.
//!
//! The renderer would fail on a missing file too, but its message depends
//! on which renderer is installed. Checking up front gives one consistent
//! error and avoids spawning a process for nothing. The content itself is
//! not inspected; whether it is acceptable HTML is the renderer's call.

use crate::error::DocPdfError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Check that `path` is an existing, readable regular file.
pub fn resolve_input(path: &Path) -> Result<PathBuf, DocPdfError> {
    let metadata = std::fs::metadata(path).map_err(|e| input_error(path, e))?;

    if !metadata.is_file() {
        return Err(DocPdfError::InvalidInput {
            path: path.to_path_buf(),
            reason: "not a regular file".into(),
        });
    }

    // Check read permission by attempting to open
    std::fs::File::open(path).map_err(|e| input_error(path, e))?;

    debug!("Resolved HTML input: {}", path.display());
    Ok(path.to_path_buf())
}

fn input_error(path: &Path, source: std::io::Error) -> DocPdfError {
    let path = path.to_path_buf();
    match source.kind() {
        std::io::ErrorKind::NotFound => DocPdfError::FileNotFound { path, source },
        std::io::ErrorKind::PermissionDenied => DocPdfError::PermissionDenied { path, source },
        _ => DocPdfError::InputUnreadable { path, source },
    }
}
