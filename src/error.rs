use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong outside the per-frame simulation.
///
/// Nothing inside `tick` returns an error: out-of-bounds entities are clamped
/// and timers are reset deterministically.
#[derive(Debug, Error)]
pub enum FightError {
    /// A sprite or sound the asset provider could not find.
    #[error("asset not found: {0}")]
    AssetMissing(String),
    /// A behavior name outside idle / floating / buster / sword_charge.
    #[error("unknown boss behavior: {0:?}")]
    InvalidBehavior(String),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type FightResult<T> = Result<T, FightError>;
