//! Sentence-aware, token-budgeted chunking of page sequences.
//!
//! Pages are windowed one at a time in page-number order. The overlap tail of
//! a page's last chunk is prefixed onto the next page so that meaning is not
//! cut at page breaks, and every chunk keeps its source page and its
//! character range in the document stream (all page texts concatenated).

mod metadata;
mod pages;
mod sentences;
mod tokens;
mod window;

pub use metadata::{finalize, format_chunks_for_output, ChunkRecord, ChunkingResult, ChunkingSummary};
pub use pages::Chunker;
pub use sentences::split_sentences;
pub use tokens::{
    counter_for_scheme, TiktokenCounter, TokenCounter, TokenInfo, TokenizerError,
    WhitespaceCounter, FALLBACK_SCHEME, WHITESPACE_SCHEME,
};
pub use window::{PageWindow, WindowBuilder};

#[cfg(test)]
mod tests;
