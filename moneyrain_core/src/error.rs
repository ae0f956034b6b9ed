use std::path::PathBuf;

use thiserror::Error;

use crate::symbols::Symbol;

/// Misconfiguration of the machine. Raised while building a [`crate::SlotMachine`],
/// never in the middle of a round.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("symbol table is empty")]
    EmptyTable,

    #[error("symbol {0} is listed more than once")]
    DuplicateSymbol(Symbol),

    #[error("symbol {0} has zero abundance")]
    ZeroAbundance(Symbol),

    #[error("symbol {0} has zero payout")]
    ZeroPayout(Symbol),

    #[error("grid must have at least one row and one column (got {rows}x{columns})")]
    EmptyGrid { rows: usize, columns: usize },

    #[error("max_lines must be between 1 and the row count {rows} (got {max_lines})")]
    MaxLines { max_lines: u32, rows: usize },

    #[error("min_bet must be at least 1")]
    MinBetZero,

    #[error("min_bet {min_bet} exceeds max_bet {max_bet}")]
    BetRange { min_bet: u32, max_bet: u32 },

    #[error("a column of {rows} rows cannot be drawn from a pool of {pool} symbols")]
    PoolTooSmall { rows: usize, pool: u64 },

    #[error("largest win {max_payout} x {max_bet} x {max_lines} lines overflows i64")]
    PayoutOverflow {
        max_payout: u32,
        max_bet: u32,
        max_lines: u32,
    },

    #[error("invalid machine config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A grid assembled by hand that is not rectangular.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no columns")]
    NoColumns,

    #[error("column {column} has {found} rows, expected {expected}")]
    Ragged {
        column: usize,
        found: usize,
        expected: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseBalanceError {
    #[error("balance is empty")]
    Empty,

    #[error("balance {0:?} is not a non-negative decimal amount")]
    Invalid(String),

    #[error("balance {0:?} has more than two fractional digits")]
    TooPrecise(String),

    #[error("balance {0:?} is too large")]
    Overflow(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
