//! PDF text extraction, page by page.

use lopdf::Document;

use super::ExtractionError;

/// Extracts the text of every page in order. Pages with no text (scans,
/// dividers) are skipped; a document or page stream that cannot be read
/// fails the whole extraction.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(bytes).map_err(pdf_failure)?;

    if doc.is_encrypted() {
        return Err(pdf_failure("file is encrypted"));
    }

    let mut page_texts = Vec::new();
    // `get_pages` is keyed by page number, so iteration follows page order.
    for page_number in doc.get_pages().keys() {
        let text = doc.extract_text(&[*page_number]).map_err(pdf_failure)?;
        if !text.trim().is_empty() {
            page_texts.push(text);
        }
    }

    Ok(page_texts.join("\n").trim().to_string())
}

fn pdf_failure(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::ExtractionFailed(format!("Could not parse PDF: {e}"))
}
