use serde::{Deserialize, Serialize};

use crate::reels::Grid;
use crate::wager::{Rejection, Wager};

/// Result of one played round. The ledger applies `net` to the player's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub wager: Wager,
    pub stake: u64,
    pub winnings: u64,
    pub winning_lines: Vec<u32>,
    /// `winnings - stake`
    pub net: i64,
    pub grid: Grid,
}

impl Settlement {
    pub fn is_win(&self) -> bool {
        self.winnings > 0
    }

    pub fn message(&self) -> String {
        format!("You won {}$!", self.winnings)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Settled(Settlement),
    Rejected { reason: Rejection },
}

impl Outcome {
    pub fn settlement(&self) -> Option<&Settlement> {
        match self {
            Outcome::Settled(s) => Some(s),
            Outcome::Rejected { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<Rejection> {
        match self {
            Outcome::Settled(_) => None,
            Outcome::Rejected { reason } => Some(*reason),
        }
    }

    pub fn into_result(self) -> Result<Settlement, Rejection> {
        match self {
            Outcome::Settled(s) => Ok(s),
            Outcome::Rejected { reason } => Err(reason),
        }
    }
}
