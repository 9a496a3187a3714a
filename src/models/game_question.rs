use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::help::{self, HelpKind, HelpPayload};
use crate::models::question::{AnswerKey, Question};

/// One question bound to one game at one level.
///
/// The binding owns a per-game random permutation of the four answers onto
/// the keys `a..d`, so the correct key differs between games even for the
/// same catalog question, plus the populate-once help cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameQuestionBinding {
    question: Question,
    /// Key slot -> 1-based answer number of the underlying question.
    key_order: [u8; 4],
    help: HashMap<HelpKind, HelpPayload>,
}

impl GameQuestionBinding {
    pub fn new(question: Question) -> Self {
        let mut key_order = [1u8, 2, 3, 4];
        key_order.shuffle(&mut rand::rng());
        Self {
            question,
            key_order,
            help: HashMap::new(),
        }
    }

    pub fn level(&self) -> u8 {
        self.question.level
    }

    pub fn text(&self) -> &str {
        &self.question.text
    }

    pub fn question(&self) -> &Question {
        &self.question
    }

    /// The four answers in key order `a..d`.
    pub fn answers(&self) -> Vec<(AnswerKey, &str)> {
        AnswerKey::ALL
            .iter()
            .map(|&key| (key, self.answer_text(key)))
            .collect()
    }

    pub fn answer_text(&self, key: AnswerKey) -> &str {
        let number = self.key_order[key.index()];
        &self.question.answers[usize::from(number - 1)]
    }

    pub fn correct_answer_key(&self) -> AnswerKey {
        let pos = self
            .key_order
            .iter()
            .position(|&n| n == self.question.correct_index)
            .unwrap_or(0);
        AnswerKey::ALL[pos]
    }

    pub fn answer_correct(&self, key: AnswerKey) -> bool {
        key == self.correct_answer_key()
    }

    /// Cached help payload for `kind`, if it was generated for this binding.
    pub fn help(&self, kind: HelpKind) -> Option<&HelpPayload> {
        self.help.get(&kind)
    }

    /// Returns the cached payload for `kind`, generating it on first use.
    /// A fifty-fifty generated earlier narrows the candidate keys the other
    /// helps draw from.
    pub(crate) fn ensure_help(&mut self, kind: HelpKind) -> &HelpPayload {
        let correct = self.correct_answer_key();
        let candidates: Vec<AnswerKey> = match self.help.get(&HelpKind::FiftyFifty) {
            Some(HelpPayload::FiftyFifty { keys }) => keys.clone(),
            _ => AnswerKey::ALL.to_vec(),
        };
        self.help.entry(kind).or_insert_with(|| match kind {
            HelpKind::FiftyFifty => help::fifty_fifty(correct),
            HelpKind::AudienceHelp => help::audience_vote(correct, &candidates),
            HelpKind::FriendCall => help::friend_call(correct, &candidates),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question() -> Question {
        Question {
            id: "q-3-0".to_string(),
            level: 3,
            text: "Which planet is known as the red planet?".to_string(),
            answers: [
                "Mars".to_string(),
                "Venus".to_string(),
                "Jupiter".to_string(),
                "Saturn".to_string(),
            ],
            correct_index: 1,
        }
    }

    #[test]
    fn shuffle_preserves_the_answer_set() {
        let binding = GameQuestionBinding::new(question());
        let mut shown: Vec<&str> = binding.answers().into_iter().map(|(_, text)| text).collect();
        shown.sort_unstable();
        assert_eq!(shown, vec!["Jupiter", "Mars", "Saturn", "Venus"]);
    }

    #[test]
    fn correct_key_points_at_the_correct_answer() {
        let binding = GameQuestionBinding::new(question());
        let key = binding.correct_answer_key();
        assert_eq!(binding.answer_text(key), "Mars");
        assert!(binding.answer_correct(key));
    }

    #[test]
    fn only_one_key_is_correct() {
        let binding = GameQuestionBinding::new(question());
        let correct: Vec<AnswerKey> = AnswerKey::ALL
            .iter()
            .copied()
            .filter(|&k| binding.answer_correct(k))
            .collect();
        assert_eq!(correct.len(), 1);
    }

    #[test]
    fn help_cache_is_stable_once_generated() {
        let mut binding = GameQuestionBinding::new(question());
        let first = binding.ensure_help(HelpKind::FiftyFifty).clone();
        let second = binding.ensure_help(HelpKind::FiftyFifty).clone();
        assert_eq!(first, second);
        assert_eq!(binding.help(HelpKind::FiftyFifty), Some(&first));
    }

    #[test]
    fn audience_help_respects_prior_fifty_fifty() {
        let mut binding = GameQuestionBinding::new(question());
        let HelpPayload::FiftyFifty { keys } =
            binding.ensure_help(HelpKind::FiftyFifty).clone()
        else {
            panic!("wrong payload variant");
        };
        let HelpPayload::AudienceVote { votes } =
            binding.ensure_help(HelpKind::AudienceHelp).clone()
        else {
            panic!("wrong payload variant");
        };
        for key in AnswerKey::ALL {
            if !keys.contains(&key) {
                assert_eq!(votes[&key], 0);
            }
        }
    }
}
