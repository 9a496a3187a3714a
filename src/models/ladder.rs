use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::models::question::{LEVEL_COUNT, QUESTION_LEVEL_MAX};

/// Classic payout table, level 0 through 14.
pub const DEFAULT_PRIZES: [i64; LEVEL_COUNT] = [
    100, 200, 300, 500, 1_000, 2_000, 4_000, 8_000, 16_000, 32_000, 64_000, 125_000, 250_000,
    500_000, 1_000_000,
];

/// Levels whose payout survives a wrong answer.
pub const DEFAULT_FIREPROOF_LEVELS: [u8; 3] = [4, 9, 14];

/// Fixed payout table plus the fireproof policy. The exact values come from
/// configuration; see `GameConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrizeLadder {
    prizes: Vec<i64>,
    fireproof: Vec<u8>,
}

impl Default for PrizeLadder {
    fn default() -> Self {
        Self {
            prizes: DEFAULT_PRIZES.to_vec(),
            fireproof: DEFAULT_FIREPROOF_LEVELS.to_vec(),
        }
    }
}

impl PrizeLadder {
    pub fn new(prizes: Vec<i64>, mut fireproof: Vec<u8>) -> Result<Self> {
        ensure!(
            prizes.len() == LEVEL_COUNT,
            "prize ladder must have {} entries, got {}",
            LEVEL_COUNT,
            prizes.len()
        );
        ensure!(prizes[0] > 0, "prizes must be positive");
        ensure!(
            prizes.windows(2).all(|w| w[0] < w[1]),
            "prizes must be strictly increasing"
        );
        ensure!(
            fireproof.iter().all(|&l| l <= QUESTION_LEVEL_MAX),
            "fireproof levels must be within 0..={}",
            QUESTION_LEVEL_MAX
        );
        fireproof.sort_unstable();
        fireproof.dedup();
        Ok(Self { prizes, fireproof })
    }

    /// Raw ladder value for a completed level; 0 when nothing was completed.
    pub fn payout(&self, level: i32) -> i64 {
        if level < 0 {
            return 0;
        }
        self.prizes.get(level as usize).copied().unwrap_or(0)
    }

    pub fn top(&self) -> i64 {
        self.prizes.last().copied().unwrap_or(0)
    }

    /// Payout of the highest fireproof level at or below `level`, 0 if none.
    /// Applied on failure and timeout, never on a voluntary cash-out.
    pub fn fireproof_floor(&self, level: i32) -> i64 {
        self.fireproof
            .iter()
            .rev()
            .find(|&&fp| i32::from(fp) <= level)
            .map(|&fp| self.payout(i32::from(fp)))
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payout_is_zero_below_level_zero() {
        let ladder = PrizeLadder::default();
        assert_eq!(ladder.payout(-1), 0);
        assert_eq!(ladder.payout(0), 100);
        assert_eq!(ladder.payout(14), 1_000_000);
    }

    #[test]
    fn top_prize_is_last_ladder_entry() {
        assert_eq!(PrizeLadder::default().top(), 1_000_000);
    }

    #[test]
    fn fireproof_floor_takes_highest_reached_tier() {
        let ladder = PrizeLadder::default();
        assert_eq!(ladder.fireproof_floor(-1), 0);
        assert_eq!(ladder.fireproof_floor(3), 0);
        assert_eq!(ladder.fireproof_floor(4), 1_000);
        assert_eq!(ladder.fireproof_floor(8), 1_000);
        assert_eq!(ladder.fireproof_floor(9), 32_000);
        assert_eq!(ladder.fireproof_floor(14), 1_000_000);
    }

    #[test]
    fn rejects_non_increasing_prizes() {
        let mut prizes = DEFAULT_PRIZES.to_vec();
        prizes[3] = prizes[2];
        assert!(PrizeLadder::new(prizes, vec![4]).is_err());
    }

    #[test]
    fn rejects_wrong_length_and_bad_fireproof_levels() {
        assert!(PrizeLadder::new(vec![100, 200], vec![]).is_err());
        assert!(PrizeLadder::new(DEFAULT_PRIZES.to_vec(), vec![15]).is_err());
    }
}
