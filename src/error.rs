//! Error types
//!
//! Library errors are typed with `thiserror`; the binary wraps them in `anyhow`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rolling or equipping loot
#[derive(Debug, Error)]
pub enum LootError {
    #[error("unknown loot table '{0}'")]
    UnknownTable(String),

    #[error("unknown item '{0}'")]
    UnknownItem(String),

    #[error("unknown rarity '{0}'")]
    UnknownRarity(String),

    #[error("loot table '{0}' has no rollable items or rarities")]
    NothingToRoll(String),

    #[error("item '{0}' cannot be equipped")]
    NotEquippable(String),
}

/// Errors raised while loading or exporting content files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize {what}: {source}")]
    Serialize {
        what: &'static str,
        #[source]
        source: ron::Error,
    },
}

pub type LootResult<T> = Result<T, LootError>;
