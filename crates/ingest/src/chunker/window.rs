//! Token-budgeted windowing over a sentence stream, with sentence-aligned overlap.

use pagewise_core::ChunkingConfig;

use super::metadata::ChunkRecord;
use super::sentences::split_sentences;
use super::tokens::TokenCounter;

/// Chunks produced for one page plus the tail to carry onto the next page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageWindow {
    pub chunks: Vec<ChunkRecord>,
    pub carryover: String,
}

/// Builds chunks for a single (carryover-prefixed) page text.
pub struct WindowBuilder<'a> {
    config: &'a ChunkingConfig,
    counter: &'a dyn TokenCounter,
}

/// The chunk under construction.
struct Accumulator {
    text: String,
    tokens: usize,
    /// Character offset of `text` within the page's combined text.
    local_start: usize,
}

impl<'a> WindowBuilder<'a> {
    pub fn new(config: &'a ChunkingConfig, counter: &'a dyn TokenCounter) -> Self {
        Self { config, counter }
    }

    /// Window `text` into chunks.
    ///
    /// `document_stream_offset` is the document-stream position of the first
    /// character of `text`, i.e. already shifted back by the carryover length.
    pub fn build(
        &self,
        text: &str,
        page_number: usize,
        starting_chunk_id: usize,
        document_stream_offset: usize,
    ) -> PageWindow {
        let mut chunks = Vec::new();
        let mut next_id = starting_chunk_id;
        let mut acc = Accumulator {
            text: String::new(),
            tokens: 0,
            local_start: 0,
        };

        for sentence in split_sentences(text) {
            let sentence_tokens = self.counter.count(&sentence);

            if !acc.text.is_empty() && acc.tokens + sentence_tokens > self.config.chunk_token_budget
            {
                let record = self.emit(&acc, page_number, next_id, document_stream_offset);
                let local_end = acc.local_start + record.text_length;
                next_id += 1;

                // Shrink the overlap so that overlap + sentence still fits the budget.
                let budget = self
                    .config
                    .overlap_token_budget
                    .min(self.config.chunk_token_budget.saturating_sub(sentence_tokens));
                let overlap = self.overlap(&acc.text, budget);

                tracing::debug!(
                    chunk_id = record.chunk_id,
                    page = page_number,
                    tokens = record.token_count,
                    overlap_chars = overlap.chars().count(),
                    "chunk finalized"
                );
                chunks.push(record);

                acc.tokens = self.counter.count(&overlap);
                acc.local_start = local_end - overlap.chars().count();
                acc.text = overlap;
            }

            acc.text.push_str(&sentence);
            acc.tokens += sentence_tokens;
        }

        if acc.text.trim().is_empty() {
            return PageWindow {
                chunks,
                carryover: String::new(),
            };
        }

        let record = self.emit(&acc, page_number, next_id, document_stream_offset);
        tracing::debug!(
            chunk_id = record.chunk_id,
            page = page_number,
            tokens = record.token_count,
            "final chunk of page"
        );
        chunks.push(record);

        PageWindow {
            chunks,
            carryover: self.overlap(&acc.text, self.config.overlap_token_budget),
        }
    }

    /// Longest run of whole trailing sentences of `chunk_text` whose token
    /// count stays within `budget`. Empty when even the last sentence is too big.
    pub fn overlap(&self, chunk_text: &str, budget: usize) -> String {
        let mut candidate = String::new();
        for sentence in split_sentences(chunk_text).iter().rev() {
            let extended = format!("{sentence}{candidate}");
            if self.counter.count(&extended) > budget {
                break;
            }
            candidate = extended;
        }
        candidate.trim().to_string()
    }

    fn emit(
        &self,
        acc: &Accumulator,
        page_number: usize,
        chunk_id: usize,
        document_stream_offset: usize,
    ) -> ChunkRecord {
        let text = acc.text.trim();
        ChunkRecord::new(
            chunk_id,
            text,
            page_number,
            document_stream_offset + acc.local_start,
            self.counter.count(text),
        )
    }
}
