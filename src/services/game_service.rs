use chrono::{Duration, Utc};
use std::sync::Arc;

use crate::balance::BalanceLedger;
use crate::catalog::QuestionCatalog;
use crate::config::GameConfig;
use crate::errors::GameError;
use crate::models::game::{AnswerOutcome, Game, GameStatus};
use crate::models::game_question::GameQuestionBinding;
use crate::models::help::{HelpKind, HelpPayload};
use crate::models::ladder::PrizeLadder;
use crate::models::question::AnswerKey;
use crate::store::{GameStore, StoreError};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

/// How many fresh-read retries a mutation gets when it keeps losing the
/// optimistic version check before `ConcurrentModification` is surfaced.
const MAX_UPDATE_ATTEMPTS: usize = 5;

/// The game engine: the only writer of `Game` state.
///
/// Every mutating operation is a read-modify-write against the store's
/// per-game version check. A caller that loses the race re-reads and usually
/// lands on the already-finished no-op path, which is exactly how duplicate
/// requests are meant to degrade. The balance credit is performed only by the
/// caller whose update transitioned `finished_at` from unset to set, so each
/// game pays out exactly once.
pub struct GameService {
    store: Arc<dyn GameStore>,
    catalog: Arc<dyn QuestionCatalog>,
    ledger: Arc<dyn BalanceLedger>,
    ladder: PrizeLadder,
    time_limit: Duration,
}

impl GameService {
    pub fn new(
        store: Arc<dyn GameStore>,
        catalog: Arc<dyn QuestionCatalog>,
        ledger: Arc<dyn BalanceLedger>,
        config: &GameConfig,
    ) -> anyhow::Result<Self> {
        let ladder = PrizeLadder::new(config.prizes.clone(), config.fireproof_levels.clone())?;
        anyhow::ensure!(
            config.time_limit_seconds > 0,
            "time_limit_seconds must be positive"
        );
        Ok(Self {
            store,
            catalog,
            ledger,
            ladder,
            time_limit: config.time_limit(),
        })
    }

    /// Creates a game for `owner_id` with all fifteen bindings drawn up
    /// front. Rejected while the owner still has a game in progress.
    pub async fn create_game(&self, owner_id: &str) -> Result<Game, GameError> {
        let now = Utc::now();
        for open in self.store.find_unfinished_for_owner(owner_id).await? {
            if open.status(self.time_limit, now) == GameStatus::InProgress {
                tracing::warn!(
                    "Rejecting new game for {}: game {} still in progress",
                    owner_id,
                    open.id
                );
                return Err(GameError::DuplicateActiveGame);
            }
        }

        let questions = self.catalog.draw_ladder().await?;
        let game = Game::new(owner_id, questions);
        self.store.insert(&game).await?;

        tracing::info!(
            "Game {} created for {} with {} questions",
            game.id,
            owner_id,
            game.questions.len()
        );
        Ok(game)
    }

    /// Submits an answer for the current question.
    ///
    /// Returns `false` without mutating anything when the game was already
    /// finished, and `false` after finalizing the game as a timeout when the
    /// window elapsed before the call (a stale in-flight answer is a loss,
    /// not a valid answer). Otherwise the answer is evaluated, the transition
    /// applied, and the call returns `true`; the resulting `status` tells the
    /// caller whether the answer was right.
    pub async fn answer(&self, game_id: &str, key: AnswerKey) -> Result<bool, GameError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let mut game = self.load(game_id).await?;
            let now = Utc::now();

            if game.is_finalized() {
                tracing::debug!("Answer for game {} ignored: already finished", game_id);
                return Ok(false);
            }

            if game.time_expired(self.time_limit, now) {
                game.record_timeout(&self.ladder, now);
                match self.store.update(&mut game).await {
                    Ok(()) => {
                        tracing::info!(
                            "Game {} timed out at level {}, prize {}",
                            game.id,
                            game.current_level,
                            game.prize
                        );
                        self.credit_prize(&game).await?;
                        return Ok(false);
                    }
                    Err(StoreError::VersionConflict) => continue,
                    Err(e) => return Err(e.into()),
                }
            }

            let Some(outcome) = game.apply_answer(key, &self.ladder, now) else {
                return Ok(false);
            };
            match self.store.update(&mut game).await {
                Ok(()) => {
                    match outcome {
                        AnswerOutcome::Advanced => tracing::info!(
                            "Game {} advanced to level {}",
                            game.id,
                            game.current_level
                        ),
                        AnswerOutcome::Won => {
                            tracing::info!("Game {} won the top prize {}", game.id, game.prize)
                        }
                        AnswerOutcome::Failed => tracing::info!(
                            "Game {} failed at level {}, prize {}",
                            game.id,
                            game.current_level,
                            game.prize
                        ),
                    }
                    if game.is_finalized() {
                        self.credit_prize(&game).await?;
                    }
                    return Ok(true);
                }
                Err(StoreError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GameError::ConcurrentModification)
    }

    /// Voluntary cash-out at the raw ladder value of the last completed
    /// level. Errors with `GameAlreadyFinished` on a finished game; a game
    /// whose window expired before the call is finalized as a timeout first.
    pub async fn take_money(&self, game_id: &str) -> Result<Game, GameError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let mut game = self.load(game_id).await?;
            let now = Utc::now();

            if game.is_finalized() {
                return Err(GameError::GameAlreadyFinished);
            }

            if game.time_expired(self.time_limit, now) {
                game.record_timeout(&self.ladder, now);
                match self.store.update(&mut game).await {
                    Ok(()) => {
                        tracing::warn!("Cash-out on game {} after expiry: timeout", game.id);
                        self.credit_prize(&game).await?;
                        return Err(GameError::GameAlreadyFinished);
                    }
                    Err(StoreError::VersionConflict) => continue,
                    Err(e) => return Err(e.into()),
                }
            }

            game.cash_out(&self.ladder, now);
            match self.store.update(&mut game).await {
                Ok(()) => {
                    tracing::info!(
                        "Game {} cashed out {} at level {}",
                        game.id,
                        game.prize,
                        game.current_level
                    );
                    self.credit_prize(&game).await?;
                    return Ok(game);
                }
                Err(StoreError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GameError::ConcurrentModification)
    }

    /// Uses one of the three single-use helps on the current question and
    /// returns the (possibly cached) payload.
    pub async fn use_help(&self, game_id: &str, kind: HelpKind) -> Result<HelpPayload, GameError> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let mut game = self.load(game_id).await?;
            let now = Utc::now();

            if game.status(self.time_limit, now) != GameStatus::InProgress {
                return Err(GameError::GameAlreadyFinished);
            }

            let payload = game.use_help(kind)?;
            match self.store.update(&mut game).await {
                Ok(()) => {
                    tracing::info!("Game {} used {} help", game.id, kind);
                    return Ok(payload);
                }
                Err(StoreError::VersionConflict) => continue,
                Err(e) => return Err(e.into()),
            }
        }
        Err(GameError::ConcurrentModification)
    }

    /// Pure status query; detects an expired window lazily, no side effects.
    pub async fn status(&self, game_id: &str) -> Result<GameStatus, GameError> {
        let game = self.load(game_id).await?;
        Ok(game.status(self.time_limit, Utc::now()))
    }

    /// The binding at the current level, or `None` once the game is over.
    pub async fn current_question(
        &self,
        game_id: &str,
    ) -> Result<Option<GameQuestionBinding>, GameError> {
        let game = self.load(game_id).await?;
        if game.status(self.time_limit, Utc::now()) != GameStatus::InProgress {
            return Ok(None);
        }
        Ok(game.current_question().cloned())
    }

    pub async fn previous_level(&self, game_id: &str) -> Result<i32, GameError> {
        Ok(self.load(game_id).await?.previous_level())
    }

    /// Status of an already-loaded game, judged at the current instant.
    pub fn status_of(&self, game: &Game) -> GameStatus {
        game.status(self.time_limit, Utc::now())
    }

    async fn load(&self, game_id: &str) -> Result<Game, GameError> {
        self.store
            .get(game_id)
            .await?
            .ok_or_else(|| GameError::GameNotFound(game_id.to_string()))
    }

    async fn credit_prize(&self, game: &Game) -> Result<(), GameError> {
        retry_async_with_config(RetryConfig::default(), || async {
            self.ledger.credit(&game.owner_id, game.prize).await
        })
        .await
        .map_err(GameError::Internal)?;
        tracing::info!(
            "Credited prize {} to {} for game {}",
            game.prize,
            game.owner_id,
            game.id
        );
        Ok(())
    }
}
