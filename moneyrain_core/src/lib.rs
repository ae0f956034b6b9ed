//! Slot machine round engine.
//!
//! A round takes a balance, a bet per line and a line count, draws a grid of
//! symbols, scores the horizontal lines and hands back a [`Settlement`] (or a
//! [`Rejection`] if the wager was refused). Nothing is stored between rounds.
//!
//! ```text
//! Wager::validate ──> ReelSampler::spin ──> paylines::evaluate ──> Settlement
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod money;
pub mod paylines;
pub mod reels;
pub mod rng;
pub mod settlement;
pub mod symbols;
pub mod wager;

pub use crate::config::MachineConfig;
pub use crate::engine::SlotMachine;
pub use crate::error::{ConfigError, GridError, ParseBalanceError};
pub use crate::money::{Balance, CENTS_PER_CREDIT};
pub use crate::paylines::{evaluate, line_return, LineEvaluation};
pub use crate::reels::{spin, Grid, PoolSampler, ReelSampler};
pub use crate::rng::{derive_hash_hex, ProvablyFairRng};
pub use crate::settlement::{Outcome, Settlement};
pub use crate::symbols::{Symbol, SymbolSpec, SymbolTable, CLASSIC_SYMBOLS};
pub use crate::wager::{Rejection, Wager};
