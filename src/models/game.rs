use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::GameError;
use crate::models::game_question::GameQuestionBinding;
use crate::models::help::{HelpKind, HelpPayload};
use crate::models::ladder::PrizeLadder;
use crate::models::question::{AnswerKey, Question, QUESTION_LEVEL_MAX};

/// Terminal classification of a game, recomputed on every query from the
/// stored fields instead of being persisted, so timeouts are detected lazily
/// without a background clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won,
    Fail,
    Timeout,
    CashedOut,
}

/// What a single evaluated answer did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AnswerOutcome {
    Advanced,
    Won,
    Failed,
}

/// The mutable aggregate root of one play-through.
///
/// `version` belongs to the store's optimistic concurrency check and is only
/// bumped by `GameStore::update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: String,
    pub owner_id: String,
    pub current_level: u8,
    pub is_failed: bool,
    pub prize: i64,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub help_used: HelpUsage,
    pub questions: Vec<GameQuestionBinding>,
    pub version: u64,
}

/// Which of the single-use helps this game already spent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HelpUsage {
    pub fifty_fifty: bool,
    pub audience_help: bool,
    pub friend_call: bool,
}

impl HelpUsage {
    pub fn is_used(&self, kind: HelpKind) -> bool {
        match kind {
            HelpKind::FiftyFifty => self.fifty_fifty,
            HelpKind::AudienceHelp => self.audience_help,
            HelpKind::FriendCall => self.friend_call,
        }
    }

    fn mark(&mut self, kind: HelpKind) {
        match kind {
            HelpKind::FiftyFifty => self.fifty_fifty = true,
            HelpKind::AudienceHelp => self.audience_help = true,
            HelpKind::FriendCall => self.friend_call = true,
        }
    }
}

impl Game {
    /// Builds a game with all bindings pre-materialized, one per level in
    /// ascending order. Expects one question per level 0..=14, the contract
    /// of `QuestionCatalog::draw_ladder`.
    pub fn new(owner_id: &str, mut questions: Vec<Question>) -> Self {
        questions.sort_by_key(|q| q.level);
        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            current_level: 0,
            is_failed: false,
            prize: 0,
            created_at: Utc::now(),
            finished_at: None,
            help_used: HelpUsage::default(),
            questions: questions.into_iter().map(GameQuestionBinding::new).collect(),
            version: 0,
        }
    }

    /// The last level completed; -1 before the first answer. Used for the
    /// prize lookup on failure and cash-out.
    pub fn previous_level(&self) -> i32 {
        i32::from(self.current_level) - 1
    }

    /// Whether a terminal outcome was recorded. The full `status` query also
    /// classifies a not-yet-finalized game whose window expired.
    pub fn is_finalized(&self) -> bool {
        self.finished_at.is_some()
    }

    pub fn time_expired(&self, time_limit: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > time_limit
    }

    /// Pure classification from the stored fields and the clock.
    ///
    /// For a finalized game the time window is judged at `finished_at`, so a
    /// terminal status never drifts afterwards; an unfinished game is judged
    /// at `now`, which is how an expired window surfaces as `timeout` without
    /// any mutation. Expiry outranks a recorded failure: running out of time
    /// is the terminal ground truth even when the last action was also wrong.
    pub fn status(&self, time_limit: Duration, now: DateTime<Utc>) -> GameStatus {
        let judged_at = self.finished_at.unwrap_or(now);
        let expired = judged_at - self.created_at > time_limit;

        if self.finished_at.is_none() && !expired && self.current_level <= QUESTION_LEVEL_MAX {
            return GameStatus::InProgress;
        }
        if expired {
            GameStatus::Timeout
        } else if self.is_failed {
            GameStatus::Fail
        } else if self.current_level > QUESTION_LEVEL_MAX {
            GameStatus::Won
        } else {
            GameStatus::CashedOut
        }
    }

    /// The binding the player is currently facing, if any.
    pub fn current_question(&self) -> Option<&GameQuestionBinding> {
        if self.is_finalized() {
            return None;
        }
        self.questions.get(usize::from(self.current_level))
    }

    /// Evaluates `key` against the current binding and applies the
    /// transition. Returns `None` when there is no current binding (already
    /// finalized or level overflow); callers treat that as a no-op.
    pub(crate) fn apply_answer(
        &mut self,
        key: AnswerKey,
        ladder: &PrizeLadder,
        now: DateTime<Utc>,
    ) -> Option<AnswerOutcome> {
        let correct = self.current_question()?.answer_correct(key);
        let outcome = if correct {
            if self.current_level == QUESTION_LEVEL_MAX {
                self.current_level += 1;
                self.finalize(ladder.top(), now);
                AnswerOutcome::Won
            } else {
                self.current_level += 1;
                AnswerOutcome::Advanced
            }
        } else {
            self.is_failed = true;
            // The floor applies to the last level completed, not the failed one.
            self.finalize(ladder.fireproof_floor(self.previous_level()), now);
            AnswerOutcome::Failed
        };
        Some(outcome)
    }

    /// A stale answer arriving after the window closed loses the game on the
    /// timeout path: failure recorded, fireproof floor fixed as the prize.
    pub(crate) fn record_timeout(&mut self, ladder: &PrizeLadder, now: DateTime<Utc>) {
        self.is_failed = true;
        self.finalize(ladder.fireproof_floor(self.previous_level()), now);
    }

    /// Voluntary cash-out at the raw ladder value of the last completed
    /// level. The level itself does not move, which is what classifies the
    /// finished game as `cashed_out`.
    pub(crate) fn cash_out(&mut self, ladder: &PrizeLadder, now: DateTime<Utc>) {
        self.finalize(ladder.payout(self.previous_level()), now);
    }

    /// Marks `kind` used and returns the current binding's payload for it,
    /// generating it on first use. Level, prize and failure state stay
    /// untouched.
    pub(crate) fn use_help(&mut self, kind: HelpKind) -> Result<HelpPayload, GameError> {
        if self.help_used.is_used(kind) {
            return Err(GameError::HelpAlreadyUsed(kind));
        }
        if self.is_finalized() {
            return Err(GameError::GameAlreadyFinished);
        }
        let Some(binding) = self.questions.get_mut(usize::from(self.current_level)) else {
            return Err(GameError::GameAlreadyFinished);
        };
        self.help_used.mark(kind);
        Ok(binding.ensure_help(kind).clone())
    }

    fn finalize(&mut self, prize: i64, now: DateTime<Utc>) {
        self.finished_at = Some(now);
        self.prize = prize;
    }
}
