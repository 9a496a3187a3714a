use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::GameError;
use crate::models::question::AnswerKey;

/// Probability that the friend suggests the correct key among the candidates.
const FRIEND_ACCURACY: f64 = 0.8;

const FRIEND_NAMES: [&str; 6] = ["Alex", "Marina", "Pavel", "Kate", "Dmitry", "Olga"];

/// The three single-use-per-game aids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpKind {
    FiftyFifty,
    AudienceHelp,
    FriendCall,
}

impl HelpKind {
    pub const ALL: [HelpKind; 3] = [
        HelpKind::FiftyFifty,
        HelpKind::AudienceHelp,
        HelpKind::FriendCall,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HelpKind::FiftyFifty => "fifty_fifty",
            HelpKind::AudienceHelp => "audience_help",
            HelpKind::FriendCall => "friend_call",
        }
    }
}

impl fmt::Display for HelpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HelpKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fifty_fifty" => Ok(HelpKind::FiftyFifty),
            "audience_help" => Ok(HelpKind::AudienceHelp),
            "friend_call" => Ok(HelpKind::FriendCall),
            other => Err(GameError::InvalidHelpKind(other.to_string())),
        }
    }
}

/// What a help produced for one question binding. Computed once, then served
/// from the binding's cache on every later read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HelpPayload {
    /// Two keys left standing: the correct one plus one random wrong one.
    FiftyFifty { keys: Vec<AnswerKey> },
    /// Simulated vote shares per key, summing to exactly 100. Keys removed by
    /// an earlier fifty-fifty get 0.
    AudienceVote { votes: BTreeMap<AnswerKey, u8> },
    /// The friend names one key; right more often than not, but no promises.
    FriendCall {
        suggested: AnswerKey,
        message: String,
    },
}

pub(crate) fn fifty_fifty(correct: AnswerKey) -> HelpPayload {
    let mut rng = rand::rng();
    let wrong: Vec<AnswerKey> = AnswerKey::ALL
        .iter()
        .copied()
        .filter(|&k| k != correct)
        .collect();
    let kept_wrong = wrong.choose(&mut rng).copied().unwrap_or(wrong[0]);
    let mut keys = vec![correct, kept_wrong];
    keys.shuffle(&mut rng);
    HelpPayload::FiftyFifty { keys }
}

/// Votes are biased toward the correct key but a wrong key can still come out
/// on top, so the audience stays plausibly fallible.
pub(crate) fn audience_vote(correct: AnswerKey, candidates: &[AnswerKey]) -> HelpPayload {
    let mut rng = rand::rng();
    let weights: Vec<(AnswerKey, u32)> = candidates
        .iter()
        .map(|&k| {
            let mut weight = rng.random_range(10..=50);
            if k == correct {
                weight += rng.random_range(5..=45);
            }
            (k, weight)
        })
        .collect();
    let total: u32 = weights.iter().map(|(_, w)| *w).sum();

    let mut votes: BTreeMap<AnswerKey, u8> = AnswerKey::ALL.iter().map(|&k| (k, 0)).collect();
    let mut assigned: u32 = 0;
    for (key, weight) in &weights {
        let share = weight * 100 / total.max(1);
        votes.insert(*key, share as u8);
        assigned += share;
    }
    // Rounding leftovers go to the correct key so the total is exactly 100.
    if let Some(share) = votes.get_mut(&correct) {
        *share += (100 - assigned.min(100)) as u8;
    }
    HelpPayload::AudienceVote { votes }
}

pub(crate) fn friend_call(correct: AnswerKey, candidates: &[AnswerKey]) -> HelpPayload {
    let mut rng = rand::rng();
    let wrong: Vec<AnswerKey> = candidates
        .iter()
        .copied()
        .filter(|&k| k != correct)
        .collect();
    let suggested = if wrong.is_empty() || rng.random_bool(FRIEND_ACCURACY) {
        correct
    } else {
        wrong.choose(&mut rng).copied().unwrap_or(correct)
    };
    let name = FRIEND_NAMES.choose(&mut rng).copied().unwrap_or("A friend");
    let message = format!("{} thinks it's answer \"{}\"", name, suggested);
    HelpPayload::FriendCall { suggested, message }
}
