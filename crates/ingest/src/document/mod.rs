mod pdf;
mod text;

use pagewise_core::Page;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("Invalid page list: {0}")]
    PageList(#[from] serde_json::Error),
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "txt", "md", "json"
    pub file_type: String,
    /// Extracted pages in page-number order. Blank pages are kept so page
    /// numbers stay aligned with the source.
    pub pages: Vec<Page>,
    /// Headings found in the document (MD only).
    pub headings: Vec<String>,
}

/// Totals describing an extraction run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSummary {
    pub total_pages: usize,
    pub total_characters: usize,
    pub blank_pages: usize,
}

impl ExtractedDocument {
    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(Page::char_len).sum()
    }

    pub fn extraction_summary(&self) -> ExtractionSummary {
        ExtractionSummary {
            total_pages: self.pages.len(),
            total_characters: self.total_chars(),
            blank_pages: self.pages.iter().filter(|p| p.is_blank()).count(),
        }
    }

    /// Whether the pages are already normalized (a JSON page list is taken as-is).
    pub fn is_prenormalized(&self) -> bool {
        self.file_type == "json"
    }
}

/// Extract text from file bytes based on file type.
///
/// A `.json` file is read as a ready-made page list: `[{"page_number": 1, "text": "..."}]`.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    let file_type = ext.as_str();

    let mut headings = Vec::new();
    let pages = match file_type {
        "pdf" => pdf::extract_pdf(bytes)?,
        "txt" | "text" => text::extract_plain(bytes),
        "md" | "markdown" => {
            let pages = text::extract_plain(bytes);
            headings = text::markdown_headings(&pages);
            pages
        }
        "json" => serde_json::from_slice::<Vec<Page>>(bytes)?,
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };

    tracing::debug!(filename, file_type, pages = pages.len(), "extracted document");

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        file_type: file_type.to_string(),
        pages,
        headings,
    })
}

/// Split extracted text into pages on `\x0C`, numbering from 1.
///
/// Blank pages are kept so numbers match the physical document; only the
/// empty block after a trailing form feed is dropped.
fn split_form_feeds(text: &str) -> Vec<Page> {
    let mut pages: Vec<Page> = text
        .split('\x0C')
        .enumerate()
        .map(|(i, page_text)| Page::new(i + 1, page_text.trim()))
        .collect();

    if pages.len() > 1 && pages.last().is_some_and(Page::is_blank) {
        pages.pop();
    }
    pages
}
