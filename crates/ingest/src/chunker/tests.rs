//! Tests for the page-aware chunking engine.

use std::sync::Arc;

use pagewise_core::{ChunkingConfig, ConfigError, Page};

use super::*;

const PAGE_ONE: &str =
    "Sun Tzu said war is deception. It requires planning. Victory favors the prepared.";
const PAGE_TWO: &str = "Preparation means logistics. Logistics win wars.";

fn whitespace_chunker(chunk: usize, overlap: usize) -> Chunker {
    Chunker::new(ChunkingConfig::new(chunk, overlap), Arc::new(WhitespaceCounter)).unwrap()
}

/// Deterministic multi-page document with sentences of 1..=9 words, each
/// sentence tagged so it can be found again in the output.
fn generated_pages(page_count: usize, sentences_per_page: usize) -> Vec<Page> {
    let mut n = 0;
    (1..=page_count)
        .map(|page_number| {
            let sentences: Vec<String> = (0..sentences_per_page)
                .map(|_| {
                    n += 1;
                    let words = (n * 7) % 9 + 1;
                    let body: Vec<String> = (0..words).map(|w| format!("s{n}w{w}")).collect();
                    format!("{}.", body.join(" "))
                })
                .collect();
            Page::new(page_number, sentences.join(" "))
        })
        .collect()
}

// ── Scenarios ───────────────────────────────────────────────────────

#[test]
fn two_page_document_carries_overlap_across_the_break() {
    let chunker = whitespace_chunker(8, 4);
    let result = chunker.chunk_pages(&[Page::new(1, PAGE_ONE), Page::new(2, PAGE_TWO)]);

    let texts = result.texts();
    assert_eq!(
        texts,
        vec![
            "Sun Tzu said war is deception.",
            "It requires planning.Victory favors the prepared.",
            "Victory favors the prepared.Preparation means logistics.",
            "Preparation means logistics.Logistics win wars.",
        ]
    );

    let pages: Vec<usize> = result.chunks.iter().map(|c| c.source_page).collect();
    assert_eq!(pages, vec![1, 1, 2, 2]);

    let spans: Vec<(usize, usize)> = result
        .chunks
        .iter()
        .map(|c| (c.start_position, c.end_position))
        .collect();
    // Page two's own text starts at 81; the carried sentence is reported 28
    // characters earlier, and the last chunk begins exactly at the page start.
    assert_eq!(spans, vec![(0, 30), (30, 79), (53, 109), (81, 128)]);
}

#[test]
fn two_page_document_with_bpe_tokens() {
    let counter = Arc::new(TiktokenCounter::cl100k().unwrap());
    let chunker = Chunker::new(ChunkingConfig::new(8, 7), counter).unwrap();
    let result = chunker.chunk_pages(&[Page::new(1, PAGE_ONE), Page::new(2, PAGE_TWO)]);

    let page_one: Vec<&ChunkRecord> = result.chunks.iter().filter(|c| c.source_page == 1).collect();
    let page_two: Vec<&ChunkRecord> = result.chunks.iter().filter(|c| c.source_page == 2).collect();

    assert!(page_one.len() >= 2, "page one should be split, got {page_one:?}");
    assert!(!page_two.is_empty());
    assert!(page_two[0].text.starts_with("Victory favors the prepared."));
    assert!(page_two[0].start_position < PAGE_ONE.chars().count());
    assert_eq!(result.summary.tokenizer, "cl100k_base");
}

#[test]
fn single_oversized_sentence_becomes_one_chunk() {
    let words: Vec<String> = (0..30).map(|i| format!("word{i}")).collect();
    let text = format!("{}.", words.join(" "));
    let result = whitespace_chunker(10, 3).chunk_pages(&[Page::new(1, text.as_str())]);

    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].text, text);
    assert_eq!(result.chunks[0].token_count, 30);
    assert!(result.chunks[0].token_count > result.summary.chunk_token_budget);
}

// ── Edge cases ──────────────────────────────────────────────────────

#[test]
fn empty_input_yields_empty_summary() {
    let result = whitespace_chunker(8, 4).chunk_pages(&[]);
    assert!(result.chunks.is_empty());
    let s = &result.summary;
    assert_eq!(s.total_chunks, 0);
    assert_eq!(s.total_tokens, 0);
    assert_eq!(s.total_characters, 0);
    assert_eq!(s.source_pages, 0);
    assert_eq!(s.average_tokens_per_chunk, 0.0);
    assert_eq!(s.average_characters_per_chunk, 0.0);
}

#[test]
fn blank_pages_pass_carryover_through() {
    let pages = vec![
        Page::new(1, "Alpha beta. Gamma delta."),
        Page::new(2, "   \n "),
        Page::new(3, "Epsilon."),
    ];
    let result = whitespace_chunker(10, 5).chunk_pages(&pages);

    assert_eq!(result.chunks.len(), 2);
    assert_eq!(result.chunks[0].text, "Alpha beta.Gamma delta.");
    assert_eq!(result.chunks[1].text, "Alpha beta.Gamma delta.Epsilon.");
    assert_eq!(result.chunks[1].source_page, 3);
    // The blank page adds nothing to the document stream.
    assert_eq!(result.chunks[1].start_position, 1);
    assert_eq!(result.summary.source_pages, 3);
}

#[test]
fn only_blank_pages_yield_nothing() {
    let pages = vec![Page::new(1, ""), Page::new(2, "\t")];
    let result = whitespace_chunker(10, 5).chunk_pages(&pages);
    assert!(result.chunks.is_empty());
    assert_eq!(result.summary.source_pages, 2);
}

#[test]
fn pages_are_processed_in_page_number_order() {
    let pages = vec![Page::new(2, "Second."), Page::new(1, "First.")];
    let result = whitespace_chunker(10, 2).chunk_pages(&pages);

    let pages: Vec<usize> = result.chunks.iter().map(|c| c.source_page).collect();
    assert_eq!(pages, vec![1, 2]);
    assert_eq!(result.chunks[0].text, "First.");
    assert_eq!(result.chunks[1].text, "First.Second.");
}

#[test]
fn invalid_budgets_fail_before_any_page() {
    let err = Chunker::new(ChunkingConfig::new(10, 10), Arc::new(WhitespaceCounter))
        .err()
        .unwrap();
    assert_eq!(err, ConfigError::OverlapNotSmaller { overlap: 10, chunk: 10 });
    assert!(Chunker::new(ChunkingConfig::new(0, 0), Arc::new(WhitespaceCounter)).is_err());
}

// ── Invariants over a larger document ───────────────────────────────

#[test]
fn ids_are_gapless_and_totals_backfilled() {
    let result = whitespace_chunker(20, 6).chunk_pages(&generated_pages(4, 12));
    let n = result.chunks.len();
    assert!(n > 4);
    for (i, chunk) in result.chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_id, i + 1);
        assert_eq!(chunk.chunk_index, i);
        assert_eq!(chunk.total_chunks, n);
    }
}

#[test]
fn positions_are_monotonic_and_sized_by_text() {
    let result = whitespace_chunker(20, 6).chunk_pages(&generated_pages(4, 12));
    for pair in result.chunks.windows(2) {
        assert!(pair[0].start_position <= pair[1].start_position, "{pair:?}");
    }
    for chunk in &result.chunks {
        assert_eq!(
            chunk.end_position - chunk.start_position,
            chunk.text.chars().count()
        );
        assert_eq!(chunk.text_length, chunk.text.chars().count());
    }
}

#[test]
fn chunks_respect_budget_and_sentence_boundaries() {
    let result = whitespace_chunker(20, 6).chunk_pages(&generated_pages(4, 12));
    for chunk in &result.chunks {
        assert!(chunk.token_count <= 20, "{chunk:?}");
        assert_eq!(split_sentences(&chunk.text).concat(), chunk.text);
    }
}

#[test]
fn every_sentence_lands_in_some_chunk() {
    let pages = generated_pages(3, 10);
    let result = whitespace_chunker(15, 4).chunk_pages(&pages);
    for page in &pages {
        for sentence in split_sentences(&page.text) {
            assert!(
                result.chunks.iter().any(|c| c.text.contains(&sentence)),
                "missing sentence {sentence:?}"
            );
        }
    }
}

#[test]
fn identical_input_gives_identical_output() {
    let pages = generated_pages(3, 9);
    let chunker = whitespace_chunker(18, 5);
    assert_eq!(chunker.chunk_pages(&pages), chunker.chunk_pages(&pages));
}

#[test]
fn summary_matches_chunks() {
    let result = whitespace_chunker(20, 6).chunk_pages(&generated_pages(2, 8));
    let tokens: usize = result.chunks.iter().map(|c| c.token_count).sum();
    let chars: usize = result.chunks.iter().map(|c| c.text_length).sum();
    assert_eq!(result.summary.total_tokens, tokens);
    assert_eq!(result.summary.total_characters, chars);
    assert_eq!(result.summary.total_chunks, result.chunks.len());
    assert_eq!(result.summary.tokenizer, "whitespace");
}
