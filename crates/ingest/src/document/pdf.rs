use pagewise_core::Page;

use super::{split_form_feeds, ExtractionError};

/// Extract one page per form-feed separated block.
pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<Page>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    if text.trim().is_empty() {
        // Scanned/image PDF: nothing to chunk, but still report the page.
        tracing::warn!("PDF contains no extractable text");
        return Ok(vec![Page::new(1, "")]);
    }

    let pages = split_form_feeds(&text);
    tracing::info!("Extracted {} pages from PDF", pages.len());
    Ok(pages)
}
