//! Token counting capability used to enforce chunk and overlap budgets.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tiktoken_rs::CoreBPE;

/// Scheme used when a requested scheme cannot be resolved.
pub const FALLBACK_SCHEME: &str = "cl100k_base";

/// Name of the whitespace word-count scheme.
pub const WHITESPACE_SCHEME: &str = "whitespace";

#[derive(Debug, Error)]
pub enum TokenizerError {
    #[error("failed to load tokenizer {scheme}: {reason}")]
    Load { scheme: String, reason: String },
}

/// Counts tokens in a string under a fixed tokenization scheme.
///
/// Implementations must be pure and deterministic, and `count("")` must be 0.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;

    /// Name of the scheme actually in use (after any fallback).
    fn scheme(&self) -> &str;

    fn count_batch(&self, texts: &[&str]) -> Vec<usize> {
        texts.iter().map(|t| self.count(t)).collect()
    }

    fn token_info(&self, text: &str) -> TokenInfo {
        let token_count = self.count(text);
        let character_count = text.chars().count();
        let tokens_per_character = if character_count > 0 {
            token_count as f64 / character_count as f64
        } else {
            0.0
        };
        TokenInfo {
            token_count,
            character_count,
            tokens_per_character,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenInfo {
    pub token_count: usize,
    pub character_count: usize,
    pub tokens_per_character: f64,
}

// ── BPE ───────────────────────────────────────────────────────────

/// BPE token counter backed by tiktoken encodings.
pub struct TiktokenCounter {
    bpe: CoreBPE,
    scheme: String,
}

impl TiktokenCounter {
    /// The `cl100k_base` encoding.
    pub fn cl100k() -> Result<Self, TokenizerError> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| TokenizerError::Load {
            scheme: FALLBACK_SCHEME.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            bpe,
            scheme: FALLBACK_SCHEME.to_string(),
        })
    }

    /// Resolve an encoding name (`o200k_base`) or a model name (`gpt-4o`).
    ///
    /// Unknown schemes degrade to `cl100k_base` with a warning instead of failing.
    pub fn for_scheme(scheme: &str) -> Result<Self, TokenizerError> {
        match load_bpe(scheme) {
            Ok(bpe) => Ok(Self {
                bpe,
                scheme: scheme.to_string(),
            }),
            Err(reason) => {
                tracing::warn!(
                    scheme,
                    fallback = FALLBACK_SCHEME,
                    %reason,
                    "unknown tokenization scheme, falling back"
                );
                Self::cl100k()
            }
        }
    }
}

fn load_bpe(scheme: &str) -> Result<CoreBPE, String> {
    let loaded = match scheme {
        "cl100k_base" => tiktoken_rs::cl100k_base(),
        "o200k_base" => tiktoken_rs::o200k_base(),
        "p50k_base" => tiktoken_rs::p50k_base(),
        "p50k_edit" => tiktoken_rs::p50k_edit(),
        "r50k_base" | "gpt2" => tiktoken_rs::r50k_base(),
        model => tiktoken_rs::get_bpe_from_model(model),
    };
    loaded.map_err(|e| e.to_string())
}

impl TokenCounter for TiktokenCounter {
    fn count(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        self.bpe.encode_ordinary(text).len()
    }

    fn scheme(&self) -> &str {
        &self.scheme
    }
}

// ── Whitespace ────────────────────────────────────────────────────

/// Approximate token count via whitespace splitting.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }

    fn scheme(&self) -> &str {
        WHITESPACE_SCHEME
    }
}

/// Build the counter for a configured scheme name.
pub fn counter_for_scheme(scheme: &str) -> Result<Arc<dyn TokenCounter>, TokenizerError> {
    if scheme.eq_ignore_ascii_case(WHITESPACE_SCHEME) {
        return Ok(Arc::new(WhitespaceCounter));
    }
    Ok(Arc::new(TiktokenCounter::for_scheme(scheme)?))
}
