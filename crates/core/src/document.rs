use serde::{Deserialize, Serialize};

/// One page of already-extracted text.
///
/// Page numbers are 1-based. The chunking engine treats pages as read-only
/// input and processes them in ascending page-number order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: usize,
    pub text: String,
}

impl Page {
    pub fn new(page_number: usize, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }

    /// True when the page carries no content worth chunking.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Length of the page text in characters (not bytes).
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
