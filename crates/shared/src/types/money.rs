//! Amount checks and currency codes.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! Every amount in the ledger is a whole number of minor units (paise,
//! cents) held in a `rust_decimal::Decimal`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian Rupee
    #[default]
    Inr,
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// UAE Dirham
    Aed,
    /// Singapore Dollar
    Sgd,
}

/// Returns true if `amount` is a whole number of minor units.
#[must_use]
pub fn is_whole_amount(amount: Decimal) -> bool {
    amount.fract().is_zero()
}

/// Returns true if `amount` is a strictly positive whole number of minor units.
#[must_use]
pub fn is_positive_whole_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO && is_whole_amount(amount)
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inr => write!(f, "INR"),
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Aed => write!(f, "AED"),
            Self::Sgd => write!(f, "SGD"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INR" => Ok(Self::Inr),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "AED" => Ok(Self::Aed),
            "SGD" => Ok(Self::Sgd),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
#[path = "money_tests.rs"]
mod tests;
