//! Game engine for a single-player trivia ladder: fifteen increasingly
//! valuable questions, three single-use helps, cash out or risk it all.
//!
//! The crate only covers the state machine (level progression, scoring,
//! time-limit enforcement, help usage, terminal-state classification).
//! Storage, question content and the user balance are reached through the
//! [`store::GameStore`], [`catalog::QuestionCatalog`] and
//! [`balance::BalanceLedger`] seams; in-memory implementations are provided
//! for tests and embedders without their own backends.

pub mod balance;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;
pub mod utils;

pub use config::GameConfig;
pub use errors::GameError;
pub use models::game::{Game, GameStatus};
pub use models::game_question::GameQuestionBinding;
pub use models::help::{HelpKind, HelpPayload};
pub use models::question::{AnswerKey, Question};
pub use services::GameService;
