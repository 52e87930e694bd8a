use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> Result<usize, ConfigError> {
    match profiled_env_opt(profile, key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub chunking: ChunkingConfig,
    pub tokenizer: TokenizerConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PAGEWISE_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let profile = env_or("PAGEWISE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            chunking: ChunkingConfig::from_env_profiled(p)?,
            tokenizer: TokenizerConfig::from_env_profiled(p),
            output: OutputConfig::from_env_profiled(p),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  chunking:   chunk_tokens={}, overlap_tokens={}",
            self.chunking.chunk_token_budget,
            self.chunking.overlap_token_budget
        );
        tracing::info!("  tokenizer:  scheme={}", self.tokenizer.scheme);
        tracing::info!("  output:     dir={}", self.output.dir.display());
    }
}

// ── Chunking ──────────────────────────────────────────────────

pub const DEFAULT_CHUNK_TOKENS: usize = 1000;
pub const DEFAULT_OVERLAP_TOKENS: usize = 150;

/// Token budgets for the chunking engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target maximum tokens per chunk (default: 1000).
    pub chunk_token_budget: usize,
    /// Maximum tokens carried into the next chunk or page (default: 150).
    pub overlap_token_budget: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_token_budget: DEFAULT_CHUNK_TOKENS,
            overlap_token_budget: DEFAULT_OVERLAP_TOKENS,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_token_budget: usize, overlap_token_budget: usize) -> Self {
        Self {
            chunk_token_budget,
            overlap_token_budget,
        }
    }

    fn from_env_profiled(p: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            chunk_token_budget: profiled_env_usize(p, "PAGEWISE_CHUNK_TOKENS", DEFAULT_CHUNK_TOKENS)?,
            overlap_token_budget: profiled_env_usize(
                p,
                "PAGEWISE_OVERLAP_TOKENS",
                DEFAULT_OVERLAP_TOKENS,
            )?,
        })
    }

    /// Both budgets must be positive and the overlap strictly smaller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_token_budget == 0 {
            return Err(ConfigError::ZeroChunkBudget);
        }
        if self.overlap_token_budget == 0 {
            return Err(ConfigError::ZeroOverlapBudget);
        }
        if self.overlap_token_budget >= self.chunk_token_budget {
            return Err(ConfigError::OverlapNotSmaller {
                overlap: self.overlap_token_budget,
                chunk: self.chunk_token_budget,
            });
        }
        Ok(())
    }
}

// ── Tokenizer ─────────────────────────────────────────────────

pub const DEFAULT_TOKENIZER_SCHEME: &str = "text-embedding-3-large";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerConfig {
    /// Encoding name (`cl100k_base`), model name, or `whitespace`.
    pub scheme: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            scheme: DEFAULT_TOKENIZER_SCHEME.to_string(),
        }
    }
}

impl TokenizerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            scheme: profiled_env_or(p, "PAGEWISE_TOKENIZER", DEFAULT_TOKENIZER_SCHEME),
        }
    }
}

// ── Output ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
        }
    }
}

impl OutputConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "PAGEWISE_OUTPUT_DIR", ".")),
        }
    }
}
