//! Conversion entry points.
//!
//! [`convert_to_file`] is the typed core: it returns a [`DocPdfError`] and
//! prints nothing. [`convert_html_to_pdf`] wraps it with the three console
//! status lines and collapses every error into a [`ConversionOutcome`].

use crate::config::ConversionConfig;
use crate::error::DocPdfError;
use crate::output::{ConversionOutcome, ConversionStats};
use crate::pipeline::{input, render};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Magic bytes every PDF file starts with.
const PDF_MAGIC: &[u8; 4] = b"%PDF";

/// Render `html_path` to a PDF at `pdf_path`.
///
/// The renderer writes into a staging file in the destination directory.
/// The staging file replaces `pdf_path` only once the renderer has
/// succeeded and the result starts with `%PDF`; on any error it is removed,
/// so a failed run never leaves partial output and never clobbers an
/// earlier PDF.
///
/// The destination directory must already exist.
pub fn convert_to_file(
    html_path: impl AsRef<Path>,
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, DocPdfError> {
    let start = Instant::now();
    let html_path = html_path.as_ref();
    let pdf_path = pdf_path.as_ref();
    info!("Starting conversion: {} → {}", html_path.display(), pdf_path.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let html = input::resolve_input(html_path)?;

    // ── Step 2: Pick renderer ────────────────────────────────────────────
    let renderer = render::resolve_renderer(config)?;

    // ── Step 3: Render into staging file ─────────────────────────────────
    let dir = match pdf_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".docpdf-")
        .suffix(".tmp.pdf")
        .tempfile_in(dir)
        .map_err(|e| DocPdfError::OutputWriteFailed {
            path: pdf_path.to_path_buf(),
            source: e,
        })?;
    debug!("Staging output at {}", staging.path().display());

    let render_start = Instant::now();
    renderer.render(&html, staging.path())?;
    debug!(
        "{} finished in {}ms",
        renderer.name(),
        render_start.elapsed().as_millis()
    );

    // ── Step 4: Verify ───────────────────────────────────────────────────
    check_pdf_magic(staging.path(), pdf_path)?;

    // ── Step 5: Publish ──────────────────────────────────────────────────
    // Staging files are created owner-only; the published PDF should not be.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(staging.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(|e| DocPdfError::OutputWriteFailed {
                path: pdf_path.to_path_buf(),
                source: e,
            })?;
    }

    // The renderer may have replaced the staging file rather than writing
    // through our handle, so go by path from here on.
    staging
        .persist(pdf_path)
        .map_err(|e| DocPdfError::OutputWriteFailed {
            path: pdf_path.to_path_buf(),
            source: e.error,
        })?;
    let bytes_written = std::fs::metadata(pdf_path)
        .map_err(|e| DocPdfError::OutputWriteFailed {
            path: pdf_path.to_path_buf(),
            source: e,
        })?
        .len();

    let stats = ConversionStats {
        renderer: renderer.name(),
        bytes_written,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} bytes in {}ms",
        stats.bytes_written, stats.duration_ms
    );

    Ok(stats)
}

/// Convert and report, printing the status lines to `out`.
///
/// Prints `Converting <html> to <pdf>...`, then either
/// `✓ PDF created successfully: <pdf>` or
/// `✗ Error converting to PDF: <error>`. Errors writing to `out` are
/// ignored; the outcome reflects only the conversion.
pub fn convert_html_to_pdf(
    html_path: impl AsRef<Path>,
    pdf_path: impl AsRef<Path>,
    config: &ConversionConfig,
    out: &mut dyn Write,
) -> ConversionOutcome {
    let html_path = html_path.as_ref();
    let pdf_path = pdf_path.as_ref();

    writeln!(
        out,
        "Converting {} to {}...",
        html_path.display(),
        pdf_path.display()
    )
    .ok();

    match convert_to_file(html_path, pdf_path, config) {
        Ok(stats) => {
            writeln!(out, "✓ PDF created successfully: {}", pdf_path.display()).ok();
            ConversionOutcome::success(stats)
        }
        Err(e) => {
            debug!("Conversion failed: {e:?}");
            writeln!(out, "✗ Error converting to PDF: {e}").ok();
            ConversionOutcome::failure(e.to_string())
        }
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn check_pdf_magic(staged: &Path, pdf_path: &Path) -> Result<(), DocPdfError> {
    let file = std::fs::File::open(staged).map_err(|e| DocPdfError::OutputWriteFailed {
        path: pdf_path.to_path_buf(),
        source: e,
    })?;

    let mut magic = Vec::with_capacity(PDF_MAGIC.len());
    file.take(PDF_MAGIC.len() as u64)
        .read_to_end(&mut magic)
        .map_err(|e| DocPdfError::OutputWriteFailed {
            path: pdf_path.to_path_buf(),
            source: e,
        })?;

    if magic.as_slice() != PDF_MAGIC {
        return Err(DocPdfError::NotAPdf { magic });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::render::Renderer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Writes a fixed payload, counting calls, optionally failing afterwards.
    struct FakeRenderer {
        payload: &'static [u8],
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeRenderer {
        fn writing(payload: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                payload,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing_after(payload: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                payload,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl Renderer for FakeRenderer {
        fn name(&self) -> String {
            "fake".into()
        }

        fn render(&self, _html: &Path, pdf: &Path) -> Result<(), DocPdfError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::fs::write(pdf, self.payload).unwrap();
            if self.fail {
                return Err(DocPdfError::InvalidInput {
                    path: pdf.to_path_buf(),
                    reason: "unexpected end of markup".into(),
                });
            }
            Ok(())
        }
    }

    /// Writes a sibling file and renames it over the output path, the way
    /// renderers that do their own atomic save behave.
    struct ReplacingRenderer;

    impl Renderer for ReplacingRenderer {
        fn name(&self) -> String {
            "replacing".into()
        }

        fn render(&self, _html: &Path, pdf: &Path) -> Result<(), DocPdfError> {
            let sibling = pdf.with_file_name("renderer-scratch.pdf");
            std::fs::write(&sibling, b"%PDF-1.7\nreplaced by rename\n").unwrap();
            std::fs::rename(&sibling, pdf).unwrap();
            Ok(())
        }
    }

    fn config_with(renderer: Arc<FakeRenderer>) -> ConversionConfig {
        ConversionConfig::builder()
            .renderer(renderer)
            .build()
            .unwrap()
    }

    fn docs_dir() -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = TempDir::new().unwrap();
        let html = dir.path().join("DOCUMENTATION.html");
        let pdf = dir.path().join("DOCUMENTATION.pdf");
        std::fs::write(&html, "<html><body><h1>Docs</h1></body></html>").unwrap();
        (dir, html, pdf)
    }

    fn staging_leftovers(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(".docpdf-")
            })
            .count()
    }

    #[test]
    fn valid_input_produces_pdf() {
        let (dir, html, pdf) = docs_dir();
        let config = config_with(FakeRenderer::writing(b"%PDF-1.7\n%fake\n"));

        let stats = convert_to_file(&html, &pdf, &config).unwrap();

        assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-1.7\n%fake\n");
        assert_eq!(stats.renderer, "fake");
        assert_eq!(stats.bytes_written, 15);
        assert_eq!(staging_leftovers(dir.path()), 0);
    }

    #[test]
    fn second_run_replaces_output() {
        let (_dir, html, pdf) = docs_dir();
        std::fs::write(&pdf, b"%PDF-old and much longer than the new one").unwrap();

        let config = config_with(FakeRenderer::writing(b"%PDF-new"));
        convert_to_file(&html, &pdf, &config).unwrap();
        convert_to_file(&html, &pdf, &config).unwrap();

        assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-new");
    }

    #[test]
    fn missing_input_never_calls_renderer() {
        let dir = TempDir::new().unwrap();
        let renderer = FakeRenderer::writing(b"%PDF-1.7");
        let config = config_with(Arc::clone(&renderer));

        let err = convert_to_file(
            dir.path().join("missing.html"),
            dir.path().join("out.pdf"),
            &config,
        )
        .unwrap_err();

        assert!(matches!(err, DocPdfError::FileNotFound { .. }));
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("out.pdf").exists());
    }

    #[test]
    fn failed_render_keeps_previous_pdf_and_no_partial() {
        let (dir, html, pdf) = docs_dir();
        std::fs::write(&pdf, b"%PDF-previous").unwrap();

        let config = config_with(FakeRenderer::failing_after(b"%PDF-1.7 trunc"));
        let err = convert_to_file(&html, &pdf, &config).unwrap_err();

        assert!(err.to_string().contains("unexpected end of markup"));
        assert_eq!(std::fs::read(&pdf).unwrap(), b"%PDF-previous");
        assert_eq!(staging_leftovers(dir.path()), 0);
    }

    #[test]
    fn non_pdf_output_is_rejected() {
        let (dir, html, pdf) = docs_dir();
        let config = config_with(FakeRenderer::writing(b"<html>oops</html>"));

        let err = convert_to_file(&html, &pdf, &config).unwrap_err();

        assert!(matches!(err, DocPdfError::NotAPdf { .. }), "got: {err:?}");
        assert!(!pdf.exists());
        assert_eq!(staging_leftovers(dir.path()), 0);
    }

    #[test]
    fn missing_output_directory_fails() {
        let (dir, html, _pdf) = docs_dir();
        let config = config_with(FakeRenderer::writing(b"%PDF-1.7"));

        let err = convert_to_file(&html, dir.path().join("nope/out.pdf"), &config).unwrap_err();
        assert!(matches!(err, DocPdfError::OutputWriteFailed { .. }), "got: {err:?}");
    }

    #[test]
    fn report_on_success() {
        let (_dir, html, pdf) = docs_dir();
        let config = config_with(FakeRenderer::writing(b"%PDF-1.7"));
        let mut out = Vec::new();

        let outcome = convert_html_to_pdf(&html, &pdf, &config, &mut out);

        assert!(outcome.is_success());
        assert_eq!(outcome.exit_code(), 0);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("Converting {} to {}...", html.display(), pdf.display())
        );
        assert_eq!(
            lines[1],
            format!("✓ PDF created successfully: {}", pdf.display())
        );
    }

    #[test]
    fn report_on_failure_includes_error_text() {
        let dir = TempDir::new().unwrap();
        let config = config_with(FakeRenderer::writing(b"%PDF-1.7"));
        let html = dir.path().join("DOCUMENTATION.html");
        let mut out = Vec::new();

        let outcome = convert_html_to_pdf(&html, dir.path().join("out.pdf"), &config, &mut out);

        assert_eq!(outcome.exit_code(), 1);
        let text = String::from_utf8(out).unwrap();
        let last = text.lines().last().unwrap();
        assert!(last.starts_with("✗ Error converting to PDF: "), "got: {last}");
        assert!(last.contains("not found"), "got: {last}");
        assert!(outcome.error().unwrap().contains("DOCUMENTATION.html"));
    }

    #[test]
    fn renderer_replacing_staging_file_is_measured_by_path() {
        let (dir, html, pdf) = docs_dir();
        let config = ConversionConfig::builder()
            .renderer(Arc::new(ReplacingRenderer))
            .build()
            .unwrap();

        let stats = convert_to_file(&html, &pdf, &config).unwrap();

        let written = std::fs::read(&pdf).unwrap();
        assert_eq!(written, b"%PDF-1.7\nreplaced by rename\n");
        assert_eq!(stats.bytes_written, written.len() as u64);
        assert_eq!(staging_leftovers(dir.path()), 0);
        assert!(!dir.path().join("renderer-scratch.pdf").exists());

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = std::fs::metadata(&pdf).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o644);
        }
    }

    #[test]
    fn staging_file_keeps_pdf_extension() {
        struct ExtensionCheck;

        impl Renderer for ExtensionCheck {
            fn name(&self) -> String {
                "extension-check".into()
            }

            fn render(&self, _html: &Path, pdf: &Path) -> Result<(), DocPdfError> {
                assert_eq!(pdf.extension().and_then(|e| e.to_str()), Some("pdf"));
                std::fs::write(pdf, b"%PDF-1.7").unwrap();
                Ok(())
            }
        }

        let (_dir, html, pdf) = docs_dir();
        let config = ConversionConfig::builder()
            .renderer(Arc::new(ExtensionCheck))
            .build()
            .unwrap();

        convert_to_file(&html, &pdf, &config).unwrap();
    }
}
