//! Extract → normalize → chunk for a single input document.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use pagewise_core::{Config, Page};
use pagewise_ingest::{
    counter_for_scheme, extract_text, Chunker, ChunkingResult, ChunkingSummary, ExtractedDocument,
    ExtractionSummary, NormalizationStats, NormalizedPage, NormalizedText, TextNormalizer,
};

/// Processing summary written next to the chunk export.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
    pub source_file: String,
    pub file_type: String,
    pub extraction: ExtractionSummary,
    pub normalization: NormalizationStats,
    pub chunking: ChunkingSummary,
}

/// Everything produced for one document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// File name without extension; prefixes every exported file.
    pub stem: String,
    pub document: ExtractedDocument,
    pub normalized: Vec<NormalizedPage>,
    pub chunking: ChunkingResult,
    pub summary: ProcessingSummary,
}

/// Build a chunker from the budgets and tokenizer scheme in `config`.
pub fn build_chunker(config: &Config) -> Result<Chunker> {
    let counter = counter_for_scheme(&config.tokenizer.scheme)
        .with_context(|| format!("failed to load tokenizer '{}'", config.tokenizer.scheme))?;
    let chunker = Chunker::new(config.chunking, counter).context("invalid chunking budgets")?;
    Ok(chunker)
}

/// Read `path` from disk and run it through the pipeline.
pub fn process_file(
    path: &Path,
    chunker: &Chunker,
    normalizer: &TextNormalizer,
) -> Result<ProcessedDocument> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?;
    process_bytes(&bytes, filename, chunker, normalizer)
}

pub fn process_bytes(
    bytes: &[u8],
    filename: &str,
    chunker: &Chunker,
    normalizer: &TextNormalizer,
) -> Result<ProcessedDocument> {
    let document = extract_text(bytes, filename)
        .with_context(|| format!("failed to extract text from {filename}"))?;
    info!(
        file = filename,
        pages = document.pages.len(),
        chars = document.total_chars(),
        "extracted document"
    );

    let normalized: Vec<NormalizedPage> = if document.is_prenormalized() {
        document
            .pages
            .iter()
            .map(|p| NormalizedPage {
                page_number: p.page_number,
                normalized: NormalizedText::passthrough(&p.text),
            })
            .collect()
    } else {
        normalizer.normalize_pages(&document.pages)
    };

    let pages: Vec<Page> = normalized.iter().map(NormalizedPage::to_page).collect();
    let chunking = chunker.chunk_pages(&pages);

    let summary = ProcessingSummary {
        source_file: filename.to_string(),
        file_type: document.file_type.clone(),
        extraction: document.extraction_summary(),
        normalization: NormalizationStats::from_results(normalized.iter().map(|p| &p.normalized)),
        chunking: chunking.summary.clone(),
    };

    Ok(ProcessedDocument {
        stem: file_stem(filename).to_string(),
        document,
        normalized,
        chunking,
        summary,
    })
}

fn file_stem(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}
