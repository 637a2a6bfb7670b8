//! Load-phase errors. The per-tick simulation has no failure paths.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("enemy {0:?} has no type")]
    MissingEnemyType(String),

    #[error("unknown enemy type: {0:?}")]
    UnknownEnemyType(String),

    #[error("unknown weapon: {0:?}")]
    UnknownWeapon(String),

    #[error("invalid map {path}: {reason}")]
    InvalidMap { path: PathBuf, reason: String },

    #[error("no level files found in {0}")]
    NoLevels(PathBuf),
}

impl GameError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GameError::Io { path: path.into(), source }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        GameError::Json { path: path.into(), source }
    }
}
