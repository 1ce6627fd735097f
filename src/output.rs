//! Result types of a conversion.

use serde::{Deserialize, Serialize};

/// Facts about a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Name of the renderer that produced the PDF.
    pub renderer: String,
    /// Size of the published PDF in bytes.
    pub bytes_written: u64,
    /// Wall-clock time from input check to publication.
    pub duration_ms: u64,
}

/// Outcome of [`crate::convert_html_to_pdf`]: a success flag plus, on
/// failure, the error text. The failure cause is deliberately not typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOutcome {
    stats: Option<ConversionStats>,
    error: Option<String>,
}

impl ConversionOutcome {
    pub fn success(stats: ConversionStats) -> Self {
        Self {
            stats: Some(stats),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            stats: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Error text, if the conversion failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn stats(&self) -> Option<&ConversionStats> {
        self.stats.as_ref()
    }

    /// Process exit code: 0 on success, 1 on any failure.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }
}
