//! Document text extraction — turns stored résumé bytes into plain text.
//!
//! Dispatch is on a closed `DocumentFormat` tag resolved once at upload time.
//! PDF text is collected page by page, DOCX text paragraph by paragraph; every
//! unit is followed by a newline. Anything else yields `UNSUPPORTED_FORMAT_TEXT`.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

mod docx;
mod pdf;

#[cfg(test)]
pub(crate) use pdf::build_test_pdf;

/// Placeholder text used for documents we have no extraction logic for.
pub const UNSUPPORTED_FORMAT_TEXT: &str = "No parse logic for this file type";

/// Format of an uploaded document, derived from its filename extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Unsupported,
}

impl DocumentFormat {
    /// Resolves the format from a filename suffix, ignoring case.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else {
            DocumentFormat::Unsupported
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Unsupported => "unsupported",
        }
    }

    /// MIME type used when serving the raw document back to its owner.
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            DocumentFormat::Unsupported => "application/octet-stream",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentFormat {
    type Err = std::convert::Infallible;

    /// Unknown tags map to `Unsupported` so stale rows never break extraction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "pdf" => DocumentFormat::Pdf,
            "docx" => DocumentFormat::Docx,
            _ => DocumentFormat::Unsupported,
        })
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to decode {format} document: {message}")]
    Decode {
        format: DocumentFormat,
        message: String,
    },
}

/// A document ready for extraction: its bytes plus the resolved format.
#[derive(Debug, Clone)]
pub struct ResumeDocument {
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

/// Extracts plain text from `bytes` according to `format`.
///
/// Unsupported formats are not an error: they produce `UNSUPPORTED_FORMAT_TEXT`.
/// A corrupt PDF or DOCX fails with `ExtractionError::Decode`.
pub fn extract(bytes: &[u8], format: DocumentFormat) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => pdf::extract_pages(bytes).map(join_units),
        DocumentFormat::Docx => docx::extract_paragraphs(bytes).map(join_units),
        DocumentFormat::Unsupported => Ok(UNSUPPORTED_FORMAT_TEXT.to_string()),
    }
}

/// Like `extract`, but absorbs decode failures into empty text.
pub fn extract_or_empty(bytes: &[u8], format: DocumentFormat) -> String {
    extract(bytes, format).unwrap_or_else(|e| {
        warn!("Extraction degraded to empty text: {e}");
        String::new()
    })
}

/// Concatenates text units, each followed by a newline.
fn join_units<I, S>(units: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut text = String::new();
    for unit in units {
        text.push_str(unit.as_ref());
        text.push('\n');
    }
    text
}
