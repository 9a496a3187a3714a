pub mod game;
pub mod game_question;
pub mod help;
pub mod ladder;
pub mod question;

pub use game::{Game, GameStatus};
pub use game_question::GameQuestionBinding;
pub use help::{HelpKind, HelpPayload};
pub use ladder::PrizeLadder;
pub use question::{AnswerKey, Question, QUESTION_LEVEL_MAX};
