//! # docpdf
//!
//! Render the project documentation (`docs/DOCUMENTATION.html`) to PDF
//! (`docs/DOCUMENTATION.pdf`) by delegating to an external HTML-to-PDF
//! engine. Layout, fonts and pagination are entirely the engine's business;
//! this crate finds the engine, runs it, and makes sure a PDF lands at the
//! destination only when the run succeeded.
//!
//! ## Pipeline Overview
//!
//! ```text
//! HTML
//!  │
//!  ├─ 1. Input    check the file exists and is readable
//!  ├─ 2. Render   run WeasyPrint or headless Chromium into a staging file
//!  ├─ 3. Verify   staging file must start with %PDF
//!  └─ 4. Publish  rename over the destination
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use docpdf::{convert_html_to_pdf, ConversionConfig, DEFAULT_HTML_PATH, DEFAULT_PDF_PATH};
//!
//! let config = ConversionConfig::from_env();
//! let outcome = convert_html_to_pdf(
//!     DEFAULT_HTML_PATH,
//!     DEFAULT_PDF_PATH,
//!     &config,
//!     &mut std::io::stdout(),
//! );
//! std::process::exit(outcome.exit_code().into());
//! ```
//!
//! ## Renderers
//!
//! | `DOCPDF_RENDERER` | Executable looked up on `PATH` |
//! |-------------------|--------------------------------|
//! | `weasyprint` (default) | `weasyprint` |
//! | `chromium`        | `chromium`, `chromium-browser`, `google-chrome`, … |
//!
//! Set `DOCPDF_RENDERER_PATH` to skip the lookup.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `docpdf` binary (tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionConfig, ConversionConfigBuilder, RendererKind, DEFAULT_HTML_PATH, DEFAULT_PDF_PATH,
};
pub use convert::{convert_html_to_pdf, convert_to_file};
pub use error::DocPdfError;
pub use output::{ConversionOutcome, ConversionStats};
pub use pipeline::render::{CommandRenderer, Renderer};
