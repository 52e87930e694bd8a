//! Document-to-chunks pipeline and file export behind the `pagewise` binary.

pub mod output;
pub mod pipeline;

pub use output::{render_report, save_results, ChunkExport, SavedFiles};
pub use pipeline::{build_chunker, process_bytes, process_file, ProcessedDocument, ProcessingSummary};
