//! Writes the per-document export files and the console report.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use pagewise_ingest::{format_chunks_for_output, ChunkRecord, ChunkingSummary, NormalizedPage};

use crate::pipeline::ProcessedDocument;

/// Envelope for `{stem}_chunks_metadata.json`.
#[derive(Debug, Serialize)]
pub struct ChunkExport<'a> {
    pub generated_at: DateTime<Utc>,
    pub chunks: &'a [ChunkRecord],
    pub summary: &'a ChunkingSummary,
}

/// Paths of the files written by [`save_results`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub normalized: PathBuf,
    pub chunked: PathBuf,
    pub metadata: PathBuf,
    pub summary: PathBuf,
}

impl SavedFiles {
    fn in_dir(out_dir: &Path, stem: &str) -> Self {
        Self {
            normalized: out_dir.join(format!("{stem}_normalized.txt")),
            chunked: out_dir.join(format!("{stem}_chunked.txt")),
            metadata: out_dir.join(format!("{stem}_chunks_metadata.json")),
            summary: out_dir.join(format!("{stem}_summary.json")),
        }
    }

    pub fn all(&self) -> [&Path; 4] {
        [
            self.normalized.as_path(),
            self.chunked.as_path(),
            self.metadata.as_path(),
            self.summary.as_path(),
        ]
    }
}

/// Write all four export files for `doc` into `out_dir`, creating it if needed.
pub fn save_results(doc: &ProcessedDocument, out_dir: &Path) -> Result<SavedFiles> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output dir {}", out_dir.display()))?;
    let files = SavedFiles::in_dir(out_dir, &doc.stem);

    write_file(&files.normalized, &format_normalized_pages(&doc.normalized))?;
    write_file(&files.chunked, &format_chunks_for_output(&doc.chunking.chunks))?;

    let export = ChunkExport {
        generated_at: Utc::now(),
        chunks: &doc.chunking.chunks,
        summary: &doc.chunking.summary,
    };
    write_file(&files.metadata, &serde_json::to_string_pretty(&export)?)?;
    write_file(&files.summary, &serde_json::to_string_pretty(&doc.summary)?)?;

    info!(dir = %out_dir.display(), stem = %doc.stem, "saved results");
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Normalized text with a marker line before each page.
fn format_normalized_pages(pages: &[NormalizedPage]) -> String {
    let mut out = String::new();
    for page in pages {
        let _ = writeln!(out, "=== PAGE {} ===", page.page_number);
        let _ = writeln!(out, "{}", page.normalized.text);
        out.push('\n');
    }
    out
}

/// Human-readable run report; shows at most `preview_chunks` chunk previews.
pub fn render_report(doc: &ProcessedDocument, preview_chunks: usize) -> String {
    let s = &doc.summary;
    let c = &s.chunking;
    let mut out = String::new();
    let _ = writeln!(out, "Document:    {} ({})", s.source_file, s.file_type);
    let _ = writeln!(
        out,
        "Pages:       {} ({} blank)",
        s.extraction.total_pages, s.extraction.blank_pages
    );
    let _ = writeln!(
        out,
        "Normalized:  {} -> {} chars ({:.1}% kept)",
        s.normalization.total_original_length,
        s.normalization.total_normalized_length,
        s.normalization.compression_ratio * 100.0
    );
    let _ = writeln!(
        out,
        "Chunks:      {} ({} tokens, {:.1} avg, budget {}/{} overlap, {})",
        c.total_chunks,
        c.total_tokens,
        c.average_tokens_per_chunk,
        c.chunk_token_budget,
        c.overlap_token_budget,
        c.tokenizer
    );

    for chunk in doc.chunking.chunks.iter().take(preview_chunks) {
        let _ = writeln!(
            out,
            "  [{}] page {} | {} tokens | {}",
            chunk.chunk_id, chunk.source_page, chunk.token_count, chunk.text_preview
        );
    }
    let hidden = doc.chunking.chunks.len().saturating_sub(preview_chunks);
    if hidden > 0 {
        let _ = writeln!(out, "  ... {hidden} more");
    }
    out
}
