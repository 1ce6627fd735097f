//! Error types for the docpdf library.
//!
//! Every failure is a [`DocPdfError`]. The reporting routine
//! ([`crate::convert::convert_html_to_pdf`]) flattens them into a single
//! "conversion failed" outcome carrying only the message text, so the
//! variants exist for the message, not for callers to branch on.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// All errors returned by the docpdf library.
#[derive(Debug, Error)]
pub enum DocPdfError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("HTML file not found: '{path}': {source}")]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}': {source}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other failure to stat or open the file (e.g. a path component
    /// that is not a directory, or a symlink loop).
    #[error("Cannot read HTML file '{path}': {source}")]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The path exists but cannot be used as an HTML document.
    #[error("Invalid input '{path}': {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    // ── Renderer errors ───────────────────────────────────────────────────
    /// No renderer executable could be located.
    #[error(
        "{renderer} executable not found (looked for: {searched}); \
install it or set DOCPDF_RENDERER_PATH to its location"
    )]
    RendererNotFound { renderer: String, searched: String },

    /// The renderer executable exists but could not be started.
    #[error("Failed to start renderer '{program}': {source}")]
    RendererSpawnFailed {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The renderer ran and reported failure.
    #[error("{renderer} failed ({status}): {detail}")]
    RenderFailed {
        renderer: String,
        status: ExitStatus,
        detail: String,
    },

    /// The renderer exited cleanly but what it wrote is not a PDF.
    #[error("Renderer output is not a PDF (first bytes: {magic:?})")]
    NotAPdf { magic: Vec<u8> },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create, write or move the output PDF into place.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
