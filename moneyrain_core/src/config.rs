use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::symbols::{SymbolSpec, SymbolTable, CLASSIC_SYMBOLS};

/// Machine shape, bet limits and symbol table.
///
/// Loaded from TOML; missing fields fall back to the classic machine:
///
/// ```toml
/// rows = 3
/// columns = 3
/// max_lines = 3
/// min_bet = 1
/// max_bet = 100
///
/// [[symbols]]
/// glyph = "$"
/// abundance = 2
/// payout = 14
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MachineConfig {
    pub rows: usize,
    pub columns: usize,
    pub max_lines: u32,
    pub min_bet: u32,
    pub max_bet: u32,
    pub symbols: Vec<SymbolSpec>,
}

impl MachineConfig {
    /// 3x3 reels, three lines, bets 1..=300, the `$ ! # @` symbol set.
    pub fn classic() -> Self {
        Self {
            rows: 3,
            columns: 3,
            max_lines: 3,
            min_bet: 1,
            max_bet: 300,
            symbols: CLASSIC_SYMBOLS.to_vec(),
        }
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Checks every limit and builds the symbol table.
    pub fn validate(&self) -> Result<SymbolTable> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.max_lines == 0 || self.max_lines as usize > self.rows {
            return Err(ConfigError::MaxLines {
                max_lines: self.max_lines,
                rows: self.rows,
            });
        }
        if self.min_bet == 0 {
            return Err(ConfigError::MinBetZero);
        }
        if self.min_bet > self.max_bet {
            return Err(ConfigError::BetRange {
                min_bet: self.min_bet,
                max_bet: self.max_bet,
            });
        }
        let table = SymbolTable::new(self.symbols.iter().copied())?;
        let pool = table.pool_size();
        if self.rows as u64 > pool {
            return Err(ConfigError::PoolTooSmall {
                rows: self.rows,
                pool,
            });
        }
        // net and winnings are i64/u64, so the largest possible win must fit both
        let max_payout = table.entries().iter().map(|e| e.payout).max().unwrap_or(0);
        let max_win =
            u128::from(max_payout) * u128::from(self.max_bet) * u128::from(self.max_lines);
        if max_win > i64::MAX as u128 {
            return Err(ConfigError::PayoutOverflow {
                max_payout,
                max_bet: self.max_bet,
                max_lines: self.max_lines,
            });
        }
        Ok(table)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::classic()
    }
}
