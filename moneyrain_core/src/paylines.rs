use serde::{Deserialize, Serialize};

use crate::reels::Grid;
use crate::symbols::SymbolTable;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEvaluation {
    pub winnings: u64,
    /// 1-based line numbers, ascending.
    pub winning_lines: Vec<u32>,
}

/// Scores the first `active_lines` rows of `grid`.
///
/// A line pays when every column shows the same symbol on that row; it pays
/// `payout(symbol) * bet_per_line`. Symbols missing from `table` never pay.
///
/// # Panics
///
/// Panics if `active_lines` exceeds the grid's row count.
pub fn evaluate(
    grid: &Grid,
    active_lines: usize,
    bet_per_line: u32,
    table: &SymbolTable,
) -> LineEvaluation {
    assert!(
        active_lines <= grid.rows(),
        "{active_lines} lines requested on a grid with {} rows",
        grid.rows()
    );

    let mut eval = LineEvaluation::default();
    for row in 0..active_lines {
        let mut symbols = grid.row(row);
        let Some(first) = symbols.next() else {
            continue;
        };
        if !symbols.all(|s| s == first) {
            continue;
        }
        let Some(payout) = table.payout(first) else {
            continue;
        };
        eval.winnings += u64::from(payout) * u64::from(bet_per_line);
        eval.winning_lines.push(row as u32 + 1);
    }
    eval
}

/// Expected payout per credit staked on a single line.
///
/// Draws within a column are exchangeable, so the symbol on any fixed row has
/// the same distribution as a single draw from a full pool.
pub fn line_return(table: &SymbolTable, columns: usize) -> f64 {
    let pool = table.pool_size() as f64;
    table
        .entries()
        .iter()
        .map(|e| f64::from(e.payout) * (f64::from(e.abundance) / pool).powi(columns as i32))
        .sum()
}
