//! Page extraction, normalization and the page-aware chunking engine.

pub mod chunker;
pub mod document;
pub mod normalize;

pub use chunker::{
    counter_for_scheme, format_chunks_for_output, Chunker, ChunkRecord, ChunkingResult,
    ChunkingSummary, TiktokenCounter, TokenCounter, TokenizerError, WhitespaceCounter,
};
pub use document::{extract_text, ExtractedDocument, ExtractionError, ExtractionSummary};
pub use normalize::{NormalizationStats, NormalizedPage, NormalizedText, TextNormalizer};
