use thiserror::Error;

use crate::models::help::HelpKind;
use crate::store::StoreError;

/// Everything a caller of the engine can run into. None of these indicate
/// corruption; they are all recoverable at the boundary.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("player already has a game in progress")]
    DuplicateActiveGame,

    #[error("game is already finished")]
    GameAlreadyFinished,

    #[error("game not found: {0}")]
    GameNotFound(String),

    #[error("{0} help was already used in this game")]
    HelpAlreadyUsed(HelpKind),

    #[error("unknown help kind: {0:?}")]
    InvalidHelpKind(String),

    /// Concurrent updates kept winning against this caller even after the
    /// fresh-read retries were exhausted.
    #[error("game was modified concurrently, retries exhausted")]
    ConcurrentModification,

    #[error("question catalog has no question for level {0}")]
    CatalogExhausted(u8),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
