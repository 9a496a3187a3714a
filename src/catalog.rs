use anyhow::{ensure, Result};
use async_trait::async_trait;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::errors::GameError;
use crate::models::question::{Question, QUESTION_LEVEL_MAX};

/// Read-only seam to the trivia content. The engine never writes questions.
#[async_trait]
pub trait QuestionCatalog: Send + Sync {
    /// Draws one question per level 0..=14, no level repeated, in ascending
    /// level order. Fails with `CatalogExhausted` when a level is empty.
    async fn draw_ladder(&self) -> Result<Vec<Question>, GameError>;
}

/// Seedable catalog that picks a random question per level on each draw.
#[derive(Default)]
pub struct InMemoryCatalog {
    by_level: RwLock<HashMap<u8, Vec<Question>>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add(&self, question: Question) -> Result<()> {
        ensure!(
            question.level <= QUESTION_LEVEL_MAX,
            "question level {} is out of range",
            question.level
        );
        ensure!(
            (1..=4).contains(&question.correct_index),
            "correct_index must be 1..=4, got {}",
            question.correct_index
        );
        self.by_level
            .write()
            .await
            .entry(question.level)
            .or_default()
            .push(question);
        Ok(())
    }
}

#[async_trait]
impl QuestionCatalog for InMemoryCatalog {
    async fn draw_ladder(&self) -> Result<Vec<Question>, GameError> {
        let by_level = self.by_level.read().await;
        let mut rng = rand::rng();
        let mut drawn = Vec::with_capacity(usize::from(QUESTION_LEVEL_MAX) + 1);
        for level in 0..=QUESTION_LEVEL_MAX {
            let question = by_level
                .get(&level)
                .and_then(|pool| pool.choose(&mut rng))
                .ok_or(GameError::CatalogExhausted(level))?;
            drawn.push(question.clone());
        }
        Ok(drawn)
    }
}
