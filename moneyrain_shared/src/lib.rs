use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use moneyrain_core::{MachineConfig, Outcome, SymbolSpec};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayRequest {
    pub client_seed: String,
    /// Decimal amount with at most two fractional digits, e.g. `"125.50"`.
    pub balance: String,
    pub bet_per_line: u32,
    pub lines: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PlayResponse {
    pub server_seed_hash: String,
    pub nonce: u64,
    pub played_at: DateTime<Utc>,
    /// Present only for settled rounds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyResponse {
    pub server_seed_hash: String,
}

/// Limits a client needs to build a valid wager form.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ConfigResponse {
    pub rows: usize,
    pub columns: usize,
    pub max_lines: u32,
    pub min_bet: u32,
    pub max_bet: u32,
    pub symbols: Vec<SymbolSpec>,
}

impl From<&MachineConfig> for ConfigResponse {
    fn from(cfg: &MachineConfig) -> Self {
        Self {
            rows: cfg.rows,
            columns: cfg.columns,
            max_lines: cfg.max_lines,
            min_bet: cfg.min_bet,
            max_bet: cfg.max_bet,
            symbols: cfg.symbols.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl ApiError {
    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
        }
    }
}
