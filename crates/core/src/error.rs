use thiserror::Error;

/// Invalid configuration. Raised before any page is processed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("chunk token budget must be positive")]
    ZeroChunkBudget,

    #[error("overlap token budget must be positive")]
    ZeroOverlapBudget,

    #[error("overlap token budget ({overlap}) must be smaller than chunk token budget ({chunk})")]
    OverlapNotSmaller { overlap: usize, chunk: usize },

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
