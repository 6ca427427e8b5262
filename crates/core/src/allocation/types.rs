//! Allocation domain types.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::MonthYear;

/// How a pending amount is spread over months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMode {
    /// One row carrying the whole amount.
    Settlement,
    /// Three monthly rows.
    Quarterly,
    /// Six monthly rows.
    HalfYearly,
    /// Twelve monthly rows.
    Yearly,
}

impl AllocationMode {
    /// Number of allocation rows this mode produces.
    #[must_use]
    pub const fn month_count(self) -> u32 {
        match self {
            Self::Settlement => 1,
            Self::Quarterly => 3,
            Self::HalfYearly => 6,
            Self::Yearly => 12,
        }
    }

    /// Storage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Settlement => "settlement",
            Self::Quarterly => "quarterly",
            Self::HalfYearly => "halfyearly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for AllocationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllocationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "settlement" => Ok(Self::Settlement),
            "quarterly" => Ok(Self::Quarterly),
            "halfyearly" => Ok(Self::HalfYearly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown allocation mode: {s}")),
        }
    }
}

/// One month's share of a pending amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedAllocation {
    /// Month the share is billed to.
    pub month: MonthYear,
    /// Share amount in minor units.
    pub amount: Decimal,
}
