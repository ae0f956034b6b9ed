use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::MachineConfig;
use crate::money::Balance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wager {
    pub bet_per_line: u32,
    pub lines: u32,
}

/// Why a round was refused before any reels were drawn.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rejection {
    #[error("bet per line is outside the table limits")]
    BetOutOfRange,
    #[error("number of lines is outside the table limits")]
    LinesOutOfRange,
    #[error("you can't bet more than you have")]
    InsufficientFunds,
}

impl Rejection {
    pub fn reason(self) -> &'static str {
        match self {
            Rejection::BetOutOfRange => "bet-out-of-range",
            Rejection::LinesOutOfRange => "lines-out-of-range",
            Rejection::InsufficientFunds => "insufficient-funds",
        }
    }
}

impl Wager {
    pub fn new(bet_per_line: u32, lines: u32) -> Self {
        Self {
            bet_per_line,
            lines,
        }
    }

    /// Total credits at risk.
    pub fn stake(&self) -> u64 {
        u64::from(self.bet_per_line) * u64::from(self.lines)
    }

    /// Checks bet range, then line range, then funds. Returns the stake.
    pub fn validate(&self, balance: Balance, config: &MachineConfig) -> Result<u64, Rejection> {
        if !(config.min_bet..=config.max_bet).contains(&self.bet_per_line) {
            return Err(Rejection::BetOutOfRange);
        }
        if !(1..=config.max_lines).contains(&self.lines) {
            return Err(Rejection::LinesOutOfRange);
        }
        let stake = self.stake();
        if !balance.covers(stake) {
            return Err(Rejection::InsufficientFunds);
        }
        Ok(stake)
    }
}
