use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::models::game::Game;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored game changed since it was read. The engine retries the
    /// whole operation from a fresh read instead of surfacing this.
    #[error("game version conflict")]
    VersionConflict,

    #[error("game not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Storage seam for games. Mutations go through `update`, which must apply a
/// per-game optimistic version check so that read-modify-write races on the
/// same game are serialized: one writer wins, the rest get `VersionConflict`.
#[async_trait]
pub trait GameStore: Send + Sync {
    async fn insert(&self, game: &Game) -> Result<(), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Game>, StoreError>;

    /// Games of `owner_id` without a recorded terminal outcome. The engine
    /// still classifies expired ones as finished via `status`.
    async fn find_unfinished_for_owner(&self, owner_id: &str) -> Result<Vec<Game>, StoreError>;

    /// Persists `game` if its version still matches the stored one, then
    /// bumps the version on the passed value to keep it current.
    async fn update(&self, game: &mut Game) -> Result<(), StoreError>;
}

/// Reference `GameStore` used by tests and embedders without a database.
#[derive(Default)]
pub struct InMemoryGameStore {
    games: RwLock<HashMap<String, Game>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GameStore for InMemoryGameStore {
    async fn insert(&self, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        if games.contains_key(&game.id) {
            return Err(StoreError::Backend(anyhow::anyhow!(
                "game {} already exists",
                game.id
            )));
        }
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Game>, StoreError> {
        Ok(self.games.read().await.get(id).cloned())
    }

    async fn find_unfinished_for_owner(&self, owner_id: &str) -> Result<Vec<Game>, StoreError> {
        Ok(self
            .games
            .read()
            .await
            .values()
            .filter(|g| g.owner_id == owner_id && g.finished_at.is_none())
            .cloned()
            .collect())
    }

    async fn update(&self, game: &mut Game) -> Result<(), StoreError> {
        let mut games = self.games.write().await;
        let stored = games
            .get(&game.id)
            .ok_or_else(|| StoreError::NotFound(game.id.clone()))?;
        if stored.version != game.version {
            return Err(StoreError::VersionConflict);
        }
        game.version += 1;
        games.insert(game.id.clone(), game.clone());
        Ok(())
    }
}
