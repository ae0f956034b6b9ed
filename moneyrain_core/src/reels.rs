use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::GridError;
use crate::symbols::{Symbol, SymbolTable};

/// The visible window after a spin, stored column by column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Symbol>>", into = "Vec<Vec<Symbol>>")]
pub struct Grid {
    columns: Vec<Vec<Symbol>>,
}

impl Grid {
    /// Builds a grid from explicit columns. Every column must have the same length.
    pub fn from_columns(columns: Vec<Vec<Symbol>>) -> Result<Self, GridError> {
        let expected = columns.first().ok_or(GridError::NoColumns)?.len();
        if let Some((column, found)) = columns
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(GridError::Ragged {
                column,
                found,
                expected,
            });
        }
        Ok(Self { columns })
    }

    pub fn rows(&self) -> usize {
        self.columns[0].len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Vec<Symbol>] {
        &self.columns
    }

    pub fn get(&self, column: usize, row: usize) -> Option<Symbol> {
        self.columns.get(column)?.get(row).copied()
    }

    /// Symbols at `row`, left to right.
    pub fn row(&self, row: usize) -> impl Iterator<Item = Symbol> + '_ {
        self.columns.iter().filter_map(move |col| col.get(row).copied())
    }

    pub fn into_columns(self) -> Vec<Vec<Symbol>> {
        self.columns
    }
}

impl TryFrom<Vec<Vec<Symbol>>> for Grid {
    type Error = GridError;

    fn try_from(columns: Vec<Vec<Symbol>>) -> Result<Self, Self::Error> {
        Self::from_columns(columns)
    }
}

impl From<Grid> for Vec<Vec<Symbol>> {
    fn from(grid: Grid) -> Self {
        grid.columns
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            let line: Vec<String> = self.row(row).map(|s| s.to_string()).collect();
            writeln!(f, "{}", line.join(" | "))?;
        }
        Ok(())
    }
}

/// Source of grids for a round.
pub trait ReelSampler {
    fn spin<R: Rng + ?Sized>(
        &self,
        rows: usize,
        columns: usize,
        table: &SymbolTable,
        rng: &mut R,
    ) -> Grid;
}

/// Draws every column without replacement from its own freshly filled pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolSampler;

impl ReelSampler for PoolSampler {
    fn spin<R: Rng + ?Sized>(
        &self,
        rows: usize,
        columns: usize,
        table: &SymbolTable,
        rng: &mut R,
    ) -> Grid {
        spin(rows, columns, table, rng)
    }
}

/// Produces a `columns` x `rows` grid.
///
/// Each column starts from a new pool holding `abundance` copies of every
/// symbol and removes each symbol it draws, so a column never shows a symbol
/// more often than its abundance. Columns do not share pools.
///
/// # Panics
///
/// Panics if `rows` exceeds the pool size or `columns` is zero. Both are
/// rejected when a [`crate::SlotMachine`] is built.
pub fn spin<R: Rng + ?Sized>(
    rows: usize,
    columns: usize,
    table: &SymbolTable,
    rng: &mut R,
) -> Grid {
    let pool_size = table.pool_size();
    assert!(
        rows as u64 <= pool_size,
        "cannot draw {rows} rows from a pool of {pool_size}"
    );
    assert!(columns > 0, "grid needs at least one column");

    let mut pool = Vec::with_capacity(pool_size as usize);
    let mut grid = Vec::with_capacity(columns);
    for col in 0..columns {
        pool.clear();
        table.fill_pool(&mut pool);
        let mut column = Vec::with_capacity(rows);
        for _ in 0..rows {
            let idx = rng.random_range(0..pool.len());
            column.push(pool.swap_remove(idx));
        }
        trace!(column = col, symbols = ?column, "drew column");
        grid.push(column);
    }
    Grid { columns: grid }
}
