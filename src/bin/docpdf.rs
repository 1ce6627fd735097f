//! CLI binary for docpdf.
//!
//! Converts `docs/DOCUMENTATION.html` to `docs/DOCUMENTATION.pdf` in the
//! current directory. Takes no arguments; anything passed is ignored.
//! Exits 0 when the PDF was produced and 1 otherwise.

use docpdf::{convert_html_to_pdf, ConversionConfig, DEFAULT_HTML_PATH, DEFAULT_PDF_PATH};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // ── Logging setup ────────────────────────────────────────────────────
    // stdout carries the status lines; diagnostics go to stderr and stay
    // quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ConversionConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");

    let mut stdout = io::stdout().lock();
    let outcome = convert_html_to_pdf(DEFAULT_HTML_PATH, DEFAULT_PDF_PATH, &config, &mut stdout);

    ExitCode::from(outcome.exit_code())
}
