pub mod config;
pub mod document;
pub mod error;

pub use config::{load_dotenv, ChunkingConfig, Config, OutputConfig, TokenizerConfig};
pub use document::*;
pub use error::*;
