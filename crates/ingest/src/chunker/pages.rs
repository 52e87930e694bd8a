//! Page-by-page driver that carries overlap across page boundaries.

use std::sync::Arc;

use pagewise_core::{ChunkingConfig, ConfigError, Page};

use super::metadata::{finalize, ChunkRecord, ChunkingResult};
use super::tokens::TokenCounter;
use super::window::WindowBuilder;

/// Chunking engine for one configuration and tokenizer.
///
/// Holds no per-run state, so one `Chunker` can serve many documents.
pub struct Chunker {
    config: ChunkingConfig,
    counter: Arc<dyn TokenCounter>,
}

/// Overlap text waiting to be prefixed onto the next non-blank page.
#[derive(Debug, Default)]
struct Carryover {
    text: String,
    /// Document-stream position the carried text was originally reported at.
    origin: usize,
}

/// Sequential state threaded through the page loop.
#[derive(Debug)]
struct RunState {
    next_chunk_id: usize,
    /// Document-stream offset of the next page's own text.
    stream_offset: usize,
    carryover: Carryover,
    chunks: Vec<ChunkRecord>,
}

impl RunState {
    fn new() -> Self {
        Self {
            next_chunk_id: 1,
            stream_offset: 0,
            carryover: Carryover::default(),
            chunks: Vec::new(),
        }
    }
}

impl Chunker {
    /// Validates the budgets up front; an invalid config never reaches a page.
    pub fn new(config: ChunkingConfig, counter: Arc<dyn TokenCounter>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, counter })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    pub fn counter(&self) -> &dyn TokenCounter {
        self.counter.as_ref()
    }

    /// Chunk pages in ascending page-number order.
    ///
    /// Blank pages produce nothing and leave any pending carryover untouched.
    pub fn chunk_pages(&self, pages: &[Page]) -> ChunkingResult {
        let mut ordered: Vec<&Page> = pages.iter().collect();
        ordered.sort_by_key(|p| p.page_number);

        let builder = WindowBuilder::new(&self.config, self.counter.as_ref());
        let mut state = RunState::new();

        for page in ordered {
            if page.is_blank() {
                tracing::debug!(page = page.page_number, "skipping blank page");
                continue;
            }
            self.chunk_page(&builder, page, &mut state);
        }

        let result = finalize(
            state.chunks,
            &self.config,
            pages.len(),
            self.counter.scheme(),
        );
        tracing::info!(
            chunks = result.summary.total_chunks,
            tokens = result.summary.total_tokens,
            pages = pages.len(),
            "chunking complete"
        );
        result
    }

    fn chunk_page(&self, builder: &WindowBuilder<'_>, page: &Page, state: &mut RunState) {
        let carry = std::mem::take(&mut state.carryover);
        let carry_len = carry.text.chars().count();
        if carry_len > 0 {
            tracing::debug!(
                chars = carry_len,
                page = page.page_number,
                "carrying over text from previous page"
            );
        }

        // The carried characters belong to the previous page's tail, so the
        // combined text starts that far before this page's own text. Never
        // report them before where the previous chunk already put them.
        let document_stream_offset = state
            .stream_offset
            .saturating_sub(carry_len)
            .max(carry.origin);

        let combined = format!("{}{}", carry.text, page.text);
        let window = builder.build(
            &combined,
            page.page_number,
            state.next_chunk_id,
            document_stream_offset,
        );

        if !window.carryover.is_empty() {
            if let Some(last) = window.chunks.last() {
                state.carryover = Carryover {
                    origin: last.end_position - window.carryover.chars().count(),
                    text: window.carryover,
                };
            }
        }

        state.stream_offset += page.char_len();
        state.next_chunk_id += window.chunks.len();
        state.chunks.extend(window.chunks);
    }
}
