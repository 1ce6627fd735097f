//! Configuration types for HTML-to-PDF conversion.
//!
//! The input and output paths are fixed (see [`DEFAULT_HTML_PATH`] and
//! [`DEFAULT_PDF_PATH`]); the only thing that varies between machines is
//! which external renderer does the work and where its executable lives.
//! That is captured by [`ConversionConfig`], built via
//! [`ConversionConfigBuilder`] or read from the environment with
//! [`ConversionConfig::from_env`].

use crate::error::DocPdfError;
use crate::pipeline::render::Renderer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// HTML document rendered by the `docpdf` binary, relative to the working directory.
pub const DEFAULT_HTML_PATH: &str = "docs/DOCUMENTATION.html";

/// PDF written by the `docpdf` binary, relative to the working directory.
pub const DEFAULT_PDF_PATH: &str = "docs/DOCUMENTATION.pdf";

/// Selects the renderer backend.
pub const ENV_RENDERER: &str = "DOCPDF_RENDERER";

/// Explicit renderer executable; skips `PATH` discovery.
pub const ENV_RENDERER_PATH: &str = "DOCPDF_RENDERER_PATH";

/// Configuration for a conversion.
///
/// # Example
/// ```rust
/// use docpdf::{ConversionConfig, RendererKind};
///
/// let config = ConversionConfig::builder()
///     .renderer_kind(RendererKind::Chromium)
///     .executable("/usr/bin/chromium")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Default)]
pub struct ConversionConfig {
    /// Which external renderer to drive. Default: [`RendererKind::WeasyPrint`].
    pub renderer_kind: RendererKind,

    /// Renderer executable. If None, the executable is looked up on `PATH`
    /// using the candidate names of `renderer_kind`.
    pub executable: Option<PathBuf>,

    /// Pre-constructed renderer. Takes precedence over `renderer_kind` and
    /// `executable`.
    pub renderer: Option<Arc<dyn Renderer>>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("renderer_kind", &self.renderer_kind)
            .field("executable", &self.executable)
            .field("renderer", &self.renderer.as_ref().map(|_| "<dyn Renderer>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read `DOCPDF_RENDERER` and `DOCPDF_RENDERER_PATH`.
    ///
    /// Never fails: an unrecognised renderer name is logged and replaced by
    /// the default, an empty path is ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let renderer_kind = match lookup(ENV_RENDERER) {
            Some(name) if !name.trim().is_empty() => {
                name.parse::<RendererKind>().unwrap_or_else(|e| {
                    warn!("{e}; using {}", RendererKind::default());
                    RendererKind::default()
                })
            }
            _ => RendererKind::default(),
        };

        let executable = lookup(ENV_RENDERER_PATH)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Self {
            renderer_kind,
            executable,
            renderer: None,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn renderer_kind(mut self, kind: RendererKind) -> Self {
        self.config.renderer_kind = kind;
        self
    }

    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.executable = Some(path.into());
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.config.renderer = Some(renderer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, DocPdfError> {
        if let Some(ref exe) = self.config.executable {
            if exe.as_os_str().is_empty() {
                return Err(DocPdfError::InvalidConfig(
                    "renderer executable path is empty".into(),
                ));
            }
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// External program that performs the HTML layout and PDF encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// `weasyprint <input> <output>`. (default)
    #[default]
    WeasyPrint,
    /// Headless Chrome/Chromium with `--print-to-pdf`.
    Chromium,
}

impl RendererKind {
    /// Executable names tried, in order, when no explicit path is configured.
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            RendererKind::WeasyPrint => &["weasyprint"],
            RendererKind::Chromium => &[
                "chromium",
                "chromium-browser",
                "google-chrome",
                "google-chrome-stable",
                "chrome",
            ],
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::WeasyPrint => f.write_str("WeasyPrint"),
            RendererKind::Chromium => f.write_str("Chromium"),
        }
    }
}

impl FromStr for RendererKind {
    type Err = DocPdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weasyprint" | "weasy" => Ok(RendererKind::WeasyPrint),
            "chromium" | "chrome" => Ok(RendererKind::Chromium),
            other => Err(DocPdfError::InvalidConfig(format!(
                "unknown renderer '{other}' (expected weasyprint or chromium)"
            ))),
        }
    }
}
