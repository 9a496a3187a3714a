use serde::{Deserialize, Serialize};
use std::fmt;

/// Hardest difficulty tier. Tiers run 0..=14, one question per tier per game.
pub const QUESTION_LEVEL_MAX: u8 = 14;

/// Number of tiers in a full game, and of rows in the prize ladder.
pub const LEVEL_COUNT: usize = QUESTION_LEVEL_MAX as usize + 1;

/// Key of one of the four answer slots shown to the player.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKey {
    A,
    B,
    C,
    D,
}

impl AnswerKey {
    pub const ALL: [AnswerKey; 4] = [AnswerKey::A, AnswerKey::B, AnswerKey::C, AnswerKey::D];

    pub fn as_char(self) -> char {
        match self {
            AnswerKey::A => 'a',
            AnswerKey::B => 'b',
            AnswerKey::C => 'c',
            AnswerKey::D => 'd',
        }
    }

    /// Slot position of the key, 0-based.
    pub fn index(self) -> usize {
        match self {
            AnswerKey::A => 0,
            AnswerKey::B => 1,
            AnswerKey::C => 2,
            AnswerKey::D => 3,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'a' => Some(AnswerKey::A),
            'b' => Some(AnswerKey::B),
            'c' => Some(AnswerKey::C),
            'd' => Some(AnswerKey::D),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An immutable catalog item. `correct_index` is 1-based, pointing into
/// `answers`, the way the seed data numbers them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub level: u8,
    pub text: String,
    pub answers: [String; 4],
    pub correct_index: u8,
}

impl Question {
    pub fn correct_answer(&self) -> &str {
        &self.answers[usize::from(self.correct_index.saturating_sub(1).min(3))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_key_round_trips_through_char() {
        for key in AnswerKey::ALL {
            assert_eq!(AnswerKey::from_char(key.as_char()), Some(key));
        }
        assert_eq!(AnswerKey::from_char('B'), Some(AnswerKey::B));
        assert_eq!(AnswerKey::from_char('x'), None);
    }

    #[test]
    fn answer_key_serializes_as_lowercase_letter() {
        assert_eq!(
            serde_json::to_string(&AnswerKey::C).unwrap(),
            "\"c\"".to_string()
        );
    }

    #[test]
    fn correct_answer_uses_one_based_index() {
        let q = Question {
            id: "q1".to_string(),
            level: 0,
            text: "?".to_string(),
            answers: [
                "first".to_string(),
                "second".to_string(),
                "third".to_string(),
                "fourth".to_string(),
            ],
            correct_index: 3,
        };
        assert_eq!(q.correct_answer(), "third");
    }
}
