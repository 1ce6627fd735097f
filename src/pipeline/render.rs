//! Rendering: hand the HTML document to an external HTML-to-PDF engine.
//!
//! The engine is a black box behind the [`Renderer`] trait. The shipped
//! implementation, [`CommandRenderer`], runs WeasyPrint or headless
//! Chromium as a child process and blocks until it exits. Nothing about
//! layout, fonts or pagination is configured here.

use crate::config::{ConversionConfig, RendererKind};
use crate::error::DocPdfError;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

/// Lines of renderer stderr kept in [`DocPdfError::RenderFailed`].
const STDERR_TAIL_LINES: usize = 5;

#[cfg(target_os = "macos")]
const CHROMIUM_APP_BUNDLES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

/// Something that can turn an HTML file into a PDF file.
///
/// `render` must write the complete PDF to `pdf` or return an error. It may
/// leave a partial file behind on error; the caller discards it.
pub trait Renderer: Send + Sync {
    /// Human-readable engine name, used in logs and stats.
    fn name(&self) -> String;

    fn render(&self, html: &Path, pdf: &Path) -> Result<(), DocPdfError>;
}

/// Runs an external renderer executable.
#[derive(Debug, Clone)]
pub struct CommandRenderer {
    kind: RendererKind,
    program: PathBuf,
}

impl CommandRenderer {
    pub fn new(kind: RendererKind, program: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for rendering `html` into `pdf`.
    pub fn args(&self, html: &Path, pdf: &Path) -> Result<Vec<OsString>, DocPdfError> {
        match self.kind {
            RendererKind::WeasyPrint => Ok(vec![html.into(), pdf.into()]),
            RendererKind::Chromium => {
                let html_abs = absolute(html)?;
                let pdf_abs = absolute(pdf)?;
                let url = Url::from_file_path(&html_abs).map_err(|()| {
                    DocPdfError::InvalidInput {
                        path: html.to_path_buf(),
                        reason: "cannot be expressed as a file:// URL".into(),
                    }
                })?;

                let mut print_to_pdf = OsString::from("--print-to-pdf=");
                print_to_pdf.push(pdf_abs.as_os_str());

                Ok(vec![
                    "--headless".into(),
                    "--disable-gpu".into(),
                    "--no-pdf-header-footer".into(),
                    print_to_pdf,
                    url.as_str().into(),
                ])
            }
        }
    }
}

impl Renderer for CommandRenderer {
    fn name(&self) -> String {
        self.kind.to_string()
    }

    fn render(&self, html: &Path, pdf: &Path) -> Result<(), DocPdfError> {
        let args = self.args(html, pdf)?;
        debug!("Running {} {:?}", self.program.display(), args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    DocPdfError::RendererNotFound {
                        renderer: self.kind.to_string(),
                        searched: self.program.display().to_string(),
                    }
                } else {
                    DocPdfError::RendererSpawnFailed {
                        program: self.program.clone(),
                        source: e,
                    }
                }
            })?;

        if !output.stdout.is_empty() {
            debug!(
                "{} stdout: {}",
                self.kind,
                String::from_utf8_lossy(&output.stdout).trim()
            );
        }

        if !output.status.success() {
            return Err(DocPdfError::RenderFailed {
                renderer: self.kind.to_string(),
                status: output.status,
                detail: stderr_tail(&output.stderr),
            });
        }

        Ok(())
    }
}

/// Pick the renderer for `config`, from most-specific to least-specific:
///
/// 1. a pre-built renderer (`config.renderer`),
/// 2. an explicit executable (`config.executable`),
/// 3. the first candidate name of `config.renderer_kind` found on `PATH`.
pub fn resolve_renderer(config: &ConversionConfig) -> Result<Arc<dyn Renderer>, DocPdfError> {
    if let Some(ref renderer) = config.renderer {
        return Ok(Arc::clone(renderer));
    }

    let kind = config.renderer_kind;

    if let Some(ref exe) = config.executable {
        return Ok(Arc::new(CommandRenderer::new(kind, exe)));
    }

    let path_var = std::env::var_os("PATH");
    let found = find_executable(kind.candidates(), path_var.as_deref())
        .or_else(|| platform_fallback(kind));

    match found {
        Some(program) => {
            info!("Using {} at {}", kind, program.display());
            Ok(Arc::new(CommandRenderer::new(kind, program)))
        }
        None => Err(DocPdfError::RendererNotFound {
            renderer: kind.to_string(),
            searched: kind.candidates().join(", "),
        }),
    }
}

/// Search the directories of a `PATH`-style variable for the first of `names`.
pub fn find_executable(names: &[&str], path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    for dir in std::env::split_paths(path_var) {
        for name in names {
            let candidate = dir.join(name);
            if is_executable(&candidate) {
                return Some(candidate);
            }
            if cfg!(windows) {
                let exe = candidate.with_extension("exe");
                if is_executable(&exe) {
                    return Some(exe);
                }
            }
        }
    }
    None
}

#[cfg(target_os = "macos")]
fn platform_fallback(kind: RendererKind) -> Option<PathBuf> {
    match kind {
        RendererKind::Chromium => CHROMIUM_APP_BUNDLES
            .iter()
            .map(PathBuf::from)
            .find(|p| is_executable(p)),
        RendererKind::WeasyPrint => None,
    }
}

#[cfg(not(target_os = "macos"))]
fn platform_fallback(_kind: RendererKind) -> Option<PathBuf> {
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn absolute(path: &Path) -> Result<PathBuf, DocPdfError> {
    std::path::absolute(path).map_err(|e| DocPdfError::InvalidInput {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Last few non-empty lines of the renderer's stderr.
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return "no diagnostic output".to_string();
    }
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("; ")
}
