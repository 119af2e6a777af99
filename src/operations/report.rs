use crate::db::repository::TransactionStore;
use crate::engine;
use crate::error::{BudgetError, Result};
use crate::models::report::{CategoryBreakdown, HomeSummary, MonthlyDetail, YearlySeries};
use log::debug;
use rust_decimal::Decimal;

// Every report re-queries the store, so results always reflect the latest writes.

pub fn home_summary(store: &TransactionStore, year: i32) -> Result<HomeSummary> {
    let totals = store.query_summary(year)?;
    let balance = engine::compute_balance(totals.total_income, totals.total_expense);

    Ok(HomeSummary {
        year,
        total_income: totals.total_income,
        total_expense: totals.total_expense,
        balance,
        monthly_average: engine::compute_monthly_average(balance, totals.active_months),
        active_months: totals.active_months,
    })
}

pub fn monthly_detail(store: &TransactionStore, year: i32, month: u32) -> Result<MonthlyDetail> {
    if !(1..=12).contains(&month) {
        return Err(BudgetError::ValidationFailed(format!(
            "Month must be between 1 and 12, got {}",
            month
        )));
    }

    let transactions = store.query_by_period(year, month)?;
    let (total_income, total_expense) = engine::compute_period_totals(&transactions);
    debug!("{} transactions in {}-{:02}", transactions.len(), year, month);

    Ok(MonthlyDetail {
        year,
        month,
        transactions,
        total_income,
        total_expense,
        balance: engine::compute_balance(total_income, total_expense),
    })
}

pub fn yearly_series(store: &TransactionStore, year: i32) -> Result<YearlySeries> {
    let grouped = store.query_year_grouped(year)?;
    let months = engine::compute_yearly_series(&grouped);

    let (total_income, total_expense) = months.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expense), m| {
            (
                income.saturating_add(m.income),
                expense.saturating_add(m.expense),
            )
        },
    );
    let balance = engine::compute_balance(total_income, total_expense);
    let monthly_average =
        engine::compute_monthly_average(balance, engine::count_active_months(&months));

    Ok(YearlySeries {
        year,
        max_magnitude: engine::find_max_magnitude(&months),
        months,
        total_income,
        total_expense,
        balance,
        monthly_average,
    })
}

pub fn category_breakdown(store: &TransactionStore, year: i32) -> Result<CategoryBreakdown> {
    let totals = store.query_category_totals(year)?;
    let total_expense = store.query_summary(year)?.total_expense;

    Ok(CategoryBreakdown {
        year,
        total_expense,
        categories: engine::compute_category_percentages(&totals, total_expense),
    })
}
