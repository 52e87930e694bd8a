use std::path::PathBuf;

use clap::Parser;
use pagewise_core::Config;

/// Split a document into overlapping, page-traceable chunks.
///
/// Flags override values read from the environment (and `.env`).
#[derive(Parser, Debug)]
#[command(name = "pagewise", version, about)]
pub struct CliArgs {
    /// Input document: .pdf, .txt, .md, or a .json page list
    pub input: PathBuf,

    /// Config profile; keys are looked up as {PROFILE}_{KEY} first
    #[arg(long, env = "PAGEWISE_PROFILE")]
    pub profile: Option<String>,

    /// Directory for the exported files
    #[arg(long, short)]
    pub out_dir: Option<PathBuf>,

    /// Maximum tokens per chunk
    #[arg(long)]
    pub chunk_tokens: Option<usize>,

    /// Maximum tokens of overlap between consecutive chunks
    #[arg(long)]
    pub overlap_tokens: Option<usize>,

    /// Tokenizer: encoding name, model name, or "whitespace"
    #[arg(long)]
    pub tokenizer: Option<String>,

    /// Do not mark ALL-CAPS lines as headers during normalization
    #[arg(long)]
    pub no_structure: bool,

    /// Number of chunk previews to print
    #[arg(long, default_value_t = 5)]
    pub preview: usize,

    /// Print the report only; do not write files
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Apply flag overrides on top of an environment-derived config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.out_dir {
            config.output.dir = dir.clone();
        }
        if let Some(n) = self.chunk_tokens {
            config.chunking.chunk_token_budget = n;
        }
        if let Some(n) = self.overlap_tokens {
            config.chunking.overlap_token_budget = n;
        }
        if let Some(scheme) = &self.tokenizer {
            config.tokenizer.scheme = scheme.clone();
        }
    }
}
