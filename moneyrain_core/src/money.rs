use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseBalanceError;

/// Cents in one credit. Bets and winnings are whole credits.
pub const CENTS_PER_CREDIT: u64 = 100;

/// A player's balance as fixed-point cents.
///
/// Decimal input is parsed exactly with at most two fractional digits; nothing
/// is rounded. Stakes are compared against the full cent value, so a balance
/// of `10.50` covers a stake of 10 credits but not 11.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Balance {
    cents: u64,
}

impl Balance {
    pub const fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub const fn from_credits(credits: u64) -> Self {
        Self {
            cents: credits.saturating_mul(CENTS_PER_CREDIT),
        }
    }

    pub const fn cents(self) -> u64 {
        self.cents
    }

    /// Whether the balance can pay a stake of `credits`.
    pub fn covers(self, credits: u64) -> bool {
        credits
            .checked_mul(CENTS_PER_CREDIT)
            .is_some_and(|needed| needed <= self.cents)
    }
}

impl FromStr for Balance {
    type Err = ParseBalanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseBalanceError::Empty);
        }
        let invalid = || ParseBalanceError::Invalid(s.to_string());
        let overflow = || ParseBalanceError::Overflow(s.to_string());

        let (whole, frac) = match s.split_once('.') {
            Some((whole, frac)) => (whole, Some(frac)),
            None => (s, None),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| overflow())?;

        let frac_cents = match frac {
            None => 0,
            Some(f) if f.is_empty() || !f.bytes().all(|b| b.is_ascii_digit()) => {
                return Err(invalid())
            }
            Some(f) if f.len() > 2 => return Err(ParseBalanceError::TooPrecise(s.to_string())),
            Some(f) if f.len() == 1 => u64::from(f.as_bytes()[0] - b'0') * 10,
            Some(f) => f.parse::<u64>().map_err(|_| invalid())?,
        };

        whole
            .checked_mul(CENTS_PER_CREDIT)
            .and_then(|c| c.checked_add(frac_cents))
            .map(Balance::from_cents)
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Balance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.cents / CENTS_PER_CREDIT,
            self.cents % CENTS_PER_CREDIT
        )
    }
}
