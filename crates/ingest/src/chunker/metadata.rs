//! Per-chunk records and the run-level summary.

use pagewise_core::ChunkingConfig;
use serde::Serialize;

const PREVIEW_CHARS: usize = 100;

/// One emitted chunk with everything needed to trace it back to its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkRecord {
    /// 1-based, gapless across the whole document.
    pub chunk_id: usize,
    /// Always `chunk_id - 1`.
    pub chunk_index: usize,
    /// Filled in by [`finalize`]; 0 until the run completes.
    pub total_chunks: usize,
    /// Page whose windowing pass produced this chunk.
    pub source_page: usize,
    /// Character offset into the document stream (inclusive).
    pub start_position: usize,
    /// Character offset into the document stream (exclusive).
    pub end_position: usize,
    /// Character count of `text`.
    pub text_length: usize,
    pub token_count: usize,
    pub text_preview: String,
    pub text: String,
}

impl ChunkRecord {
    pub(crate) fn new(
        chunk_id: usize,
        text: &str,
        source_page: usize,
        start_position: usize,
        token_count: usize,
    ) -> Self {
        let text_length = text.chars().count();
        Self {
            chunk_id,
            chunk_index: chunk_id - 1,
            total_chunks: 0,
            source_page,
            start_position,
            end_position: start_position + text_length,
            text_length,
            token_count,
            text_preview: preview(text, text_length),
            text: text.to_string(),
        }
    }
}

fn preview(text: &str, text_length: usize) -> String {
    if text_length > PREVIEW_CHARS {
        let mut head: String = text.chars().take(PREVIEW_CHARS).collect();
        head.push_str("...");
        head
    } else {
        text.to_string()
    }
}

/// Totals for one chunking run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkingSummary {
    pub total_chunks: usize,
    pub total_tokens: usize,
    pub total_characters: usize,
    pub chunk_token_budget: usize,
    pub overlap_token_budget: usize,
    /// Number of input pages, blank ones included.
    pub source_pages: usize,
    pub average_tokens_per_chunk: f64,
    pub average_characters_per_chunk: f64,
    /// Tokenization scheme the counts were computed with.
    pub tokenizer: String,
}

/// Output of a run: the ordered chunks plus their summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkingResult {
    pub chunks: Vec<ChunkRecord>,
    pub summary: ChunkingSummary,
}

impl ChunkingResult {
    /// Chunk texts in emission order, parallel to `chunks`.
    pub fn texts(&self) -> Vec<&str> {
        self.chunks.iter().map(|c| c.text.as_str()).collect()
    }
}

/// Close out a run: backfill `total_chunks` on every record and summarize.
pub fn finalize(
    mut chunks: Vec<ChunkRecord>,
    config: &ChunkingConfig,
    source_pages: usize,
    tokenizer: &str,
) -> ChunkingResult {
    let total_chunks = chunks.len();
    for chunk in &mut chunks {
        chunk.total_chunks = total_chunks;
    }

    let total_tokens: usize = chunks.iter().map(|c| c.token_count).sum();
    let total_characters: usize = chunks.iter().map(|c| c.text_length).sum();
    let (average_tokens_per_chunk, average_characters_per_chunk) = if total_chunks > 0 {
        (
            total_tokens as f64 / total_chunks as f64,
            total_characters as f64 / total_chunks as f64,
        )
    } else {
        (0.0, 0.0)
    };

    ChunkingResult {
        summary: ChunkingSummary {
            total_chunks,
            total_tokens,
            total_characters,
            chunk_token_budget: config.chunk_token_budget,
            overlap_token_budget: config.overlap_token_budget,
            source_pages,
            average_tokens_per_chunk,
            average_characters_per_chunk,
            tokenizer: tokenizer.to_string(),
        },
        chunks,
    }
}

/// Render chunks as a plain-text listing with a header per chunk.
pub fn format_chunks_for_output(chunks: &[ChunkRecord]) -> String {
    let mut lines = Vec::with_capacity(chunks.len() * 4);
    for chunk in chunks {
        lines.push(format!("=== CHUNK {} ===", chunk.chunk_id));
        lines.push(format!(
            "Page: {} | Tokens: {} | Position: {}-{}",
            chunk.source_page, chunk.token_count, chunk.start_position, chunk.end_position
        ));
        lines.push(chunk.text.clone());
        lines.push(String::new());
    }
    lines.join("\n")
}
