//! pagewise: turn a document into token-budgeted, page-traceable chunks.
//!
//! Pipeline: extract pages → normalize → chunk → export files.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use pagewise_core::{load_dotenv, Config};
use pagewise_ingest::TextNormalizer;

use pagewise_cli::{build_chunker, process_file, render_report, save_results};

use crate::cli::CliArgs;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    load_dotenv();
    let args = CliArgs::parse();

    let mut config = match &args.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    }
    .context("failed to load configuration")?;
    args.apply(&mut config);
    config.log_summary();

    let chunker = build_chunker(&config)?;
    let normalizer = TextNormalizer {
        preserve_structure: !args.no_structure,
    };

    let doc = process_file(&args.input, &chunker, &normalizer)?;
    print!("{}", render_report(&doc, args.preview));

    if args.dry_run {
        info!("dry run, no files written");
        return Ok(());
    }

    let files = save_results(&doc, &config.output.dir)?;
    for path in files.all() {
        println!("wrote {}", path.display());
    }
    Ok(())
}
