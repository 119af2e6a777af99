use crate::models::transaction::{Category, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

/// Income and expense sums for one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: u32,
    pub income: Decimal,
    pub expense: Decimal,
}

impl MonthTotals {
    pub fn empty(month: u32) -> Self {
        Self {
            month,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }

    pub fn has_activity(&self) -> bool {
        self.income > Decimal::ZERO || self.expense > Decimal::ZERO
    }
}

/// Year-wide totals as returned by the store's summary query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearTotals {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub active_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub total: Decimal,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HomeSummary {
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub monthly_average: Decimal,
    pub active_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyDetail {
    pub year: i32,
    pub month: u32,
    /// Newest first
    pub transactions: Vec<Transaction>,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlySeries {
    pub year: i32,
    pub months: Vec<MonthTotals>,
    /// Largest income or expense of any month, 0 for an empty year
    pub max_magnitude: Decimal,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
    pub monthly_average: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub year: i32,
    pub total_expense: Decimal,
    pub categories: Vec<CategoryShare>,
}
