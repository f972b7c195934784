//! Text Extractor — turns an uploaded résumé (PDF, DOCX or plain text) into a
//! single trimmed string.
//!
//! Dispatch is purely by filename suffix. The extractor does no OCR, layout
//! analysis or language detection; a parser rejection is reported as
//! `ExtractionFailed` and never panics the caller.

use thiserror::Error;

pub mod docx;
pub mod pdf;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload PDF, DOCX, or TXT.")]
    UnsupportedType,

    #[error("{0}")]
    ExtractionFailed(String),
}

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    /// `.docx` and `.doc` both go through the OOXML reader; legacy binary
    /// `.doc` files fail there with `ExtractionFailed`.
    Docx,
    Text,
}

impl DocumentKind {
    /// Case-insensitive suffix match on the declared filename.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let name = filename.to_lowercase();
        if name.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if name.ends_with(".docx") || name.ends_with(".doc") {
            Ok(DocumentKind::Docx)
        } else if name.ends_with(".txt") {
            Ok(DocumentKind::Text)
        } else {
            Err(ExtractionError::UnsupportedType)
        }
    }
}

/// Extracts plain text from raw file bytes, choosing the parser from `filename`.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<String, ExtractionError> {
    match DocumentKind::from_filename(filename)? {
        DocumentKind::Pdf => pdf::extract_pdf_text(bytes),
        DocumentKind::Docx => docx::extract_docx_text(bytes),
        DocumentKind::Text => Ok(decode_plain_text(bytes)),
    }
}

/// Lossy UTF-8 decode: undecodable sequences become U+FFFD instead of failing.
fn decode_plain_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim().to_string()
}
