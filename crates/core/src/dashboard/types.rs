//! Dashboard data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use society_shared::types::{Currency, SocietyId};

use crate::balance::BalanceInputs;

/// Raw per-society aggregates read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DashboardFigures {
    /// Inputs of the final balance.
    pub balance: BalanceInputs,
    /// Sum of income rows.
    pub total_income: Decimal,
    /// Sum of due amounts already paid.
    pub total_maintenance_collected: Decimal,
    /// Non-deleted penalties still unpaid.
    pub outstanding_penalties: Decimal,
    /// Due rows still unpaid.
    pub unpaid_dues: u64,
}

/// Row counts of the tables the dashboard sums over.
///
/// Other processes (the cron generator, the seeder) insert rows without
/// reaching this server's cache; a cached summary is only served while the
/// counts it was computed against still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RowFingerprint {
    /// Due rows.
    pub dues: u64,
    /// Penalty rows, deleted ones included.
    pub penalties: u64,
    /// Expense and income rows.
    pub ledger_entries: u64,
}

/// Dashboard response for one society.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Society these figures belong to.
    pub society_id: SocietyId,
    /// Currency of all amounts.
    pub currency: Currency,
    /// Opening balance.
    pub opening_balance: Decimal,
    /// Sum of expenses.
    pub total_expenses: Decimal,
    /// Sum of incomes (reported, not part of the final balance).
    pub total_income: Decimal,
    /// Sum of maintenance charged on due rows.
    pub total_maintenance_charged: Decimal,
    /// Sum of maintenance already paid.
    pub total_maintenance_collected: Decimal,
    /// Sum of non-deleted penalties.
    pub total_penalties: Decimal,
    /// Non-deleted penalties still unpaid.
    pub outstanding_penalties: Decimal,
    /// Due rows still unpaid.
    pub unpaid_dues: u64,
    /// `opening - expenses + maintenance charged + penalties`.
    pub final_balance: Decimal,
    /// When the figures were computed.
    pub generated_at: DateTime<Utc>,
}

impl DashboardSummary {
    /// Builds the summary from storage aggregates.
    #[must_use]
    pub fn from_figures(
        society_id: SocietyId,
        figures: &DashboardFigures,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let balance = figures.balance;
        Self {
            society_id,
            currency: Currency::default(),
            opening_balance: balance.opening_balance,
            total_expenses: balance.total_expenses,
            total_income: figures.total_income,
            total_maintenance_charged: balance.total_maintenance_charged,
            total_maintenance_collected: figures.total_maintenance_collected,
            total_penalties: balance.total_penalties,
            outstanding_penalties: figures.outstanding_penalties,
            unpaid_dues: figures.unpaid_dues,
            final_balance: balance.final_balance(),
            generated_at,
        }
    }
}
