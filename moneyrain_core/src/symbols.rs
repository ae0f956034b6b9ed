use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A reel symbol, identified by its glyph.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct Symbol(pub char);

impl Symbol {
    pub const DOLLAR: Symbol = Symbol('$');
    pub const BANG: Symbol = Symbol('!');
    pub const HASH: Symbol = Symbol('#');
    pub const AT: Symbol = Symbol('@');

    pub fn glyph(self) -> char {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One row of the symbol table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SymbolSpec {
    #[serde(rename = "glyph")]
    pub symbol: Symbol,
    /// Copies of the symbol in a freshly built column pool.
    pub abundance: u32,
    /// Credits paid per unit of line bet when a line matches on this symbol.
    pub payout: u32,
}

impl SymbolSpec {
    pub const fn new(symbol: Symbol, abundance: u32, payout: u32) -> Self {
        Self {
            symbol,
            abundance,
            payout,
        }
    }
}

/// The classic four-symbol set: rare symbols pay more.
pub const CLASSIC_SYMBOLS: [SymbolSpec; 4] = [
    SymbolSpec::new(Symbol::DOLLAR, 2, 14),
    SymbolSpec::new(Symbol::BANG, 4, 12),
    SymbolSpec::new(Symbol::HASH, 6, 8),
    SymbolSpec::new(Symbol::AT, 8, 6),
];

/// Immutable abundance and payout lookup for every symbol on the machine.
///
/// Entry order is kept as configured so that pools are built in a stable
/// order and spins replay identically for the same random source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    entries: Vec<SymbolSpec>,
}

impl SymbolTable {
    pub fn new(entries: impl IntoIterator<Item = SymbolSpec>) -> Result<Self, ConfigError> {
        let entries: Vec<SymbolSpec> = entries.into_iter().collect();
        if entries.is_empty() {
            return Err(ConfigError::EmptyTable);
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for spec in &entries {
            if !seen.insert(spec.symbol) {
                return Err(ConfigError::DuplicateSymbol(spec.symbol));
            }
            if spec.abundance == 0 {
                return Err(ConfigError::ZeroAbundance(spec.symbol));
            }
            if spec.payout == 0 {
                return Err(ConfigError::ZeroPayout(spec.symbol));
            }
        }
        Ok(Self { entries })
    }

    pub fn classic() -> Self {
        Self {
            entries: CLASSIC_SYMBOLS.to_vec(),
        }
    }

    fn spec(&self, symbol: Symbol) -> Option<&SymbolSpec> {
        self.entries.iter().find(|e| e.symbol == symbol)
    }

    pub fn abundance(&self, symbol: Symbol) -> Option<u32> {
        self.spec(symbol).map(|e| e.abundance)
    }

    pub fn payout(&self, symbol: Symbol) -> Option<u32> {
        self.spec(symbol).map(|e| e.payout)
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.entries.iter().map(|e| e.symbol)
    }

    pub fn entries(&self) -> &[SymbolSpec] {
        &self.entries
    }

    /// Size of one column's draw pool.
    pub fn pool_size(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.abundance)).sum()
    }

    /// Appends `abundance` copies of every symbol to `pool`.
    pub(crate) fn fill_pool(&self, pool: &mut Vec<Symbol>) {
        for spec in &self.entries {
            pool.extend(std::iter::repeat(spec.symbol).take(spec.abundance as usize));
        }
    }
}
