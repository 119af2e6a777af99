//! Pure aggregation over store query results.
//!
//! Nothing here touches storage or keeps state between calls. Amounts stay in
//! `Decimal`; only percentages and chart scaling leave exact arithmetic.

use crate::models::report::{CategoryShare, MonthTotals};
use crate::models::transaction::{Category, Transaction, TransactionType};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::BTreeMap;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Income minus expense. May be negative.
pub fn compute_balance(income: Decimal, expense: Decimal) -> Decimal {
    income - expense
}

/// Balance spread over the months that had activity, or zero when none did.
pub fn compute_monthly_average(balance: Decimal, active_months: u32) -> Decimal {
    if active_months == 0 {
        return Decimal::ZERO;
    }
    balance / Decimal::from(active_months)
}

/// Builds the twelve-month series from grouped sums.
///
/// All months start at zero and are then overwritten by whatever `grouped`
/// holds, so sparse input still yields months 1 through 12 in order. Keys
/// outside that range are dropped.
pub fn compute_yearly_series(grouped: &BTreeMap<u32, (Decimal, Decimal)>) -> Vec<MonthTotals> {
    let mut series: Vec<MonthTotals> = (1..=12).map(MonthTotals::empty).collect();

    for (&month, &(income, expense)) in grouped {
        if let Some(slot) = month
            .checked_sub(1)
            .and_then(|idx| series.get_mut(idx as usize))
        {
            slot.income = income;
            slot.expense = expense;
        }
    }
    series
}

/// Attaches each category's share of `total_expense`, keeping input order.
pub fn compute_category_percentages(
    category_totals: &[(Category, Decimal)],
    total_expense: Decimal,
) -> Vec<CategoryShare> {
    category_totals
        .iter()
        .map(|&(category, total)| {
            let percentage = if total_expense > Decimal::ZERO {
                (total / total_expense * Decimal::ONE_HUNDRED)
                    .to_f64()
                    .unwrap_or(0.0)
            } else {
                0.0
            };
            CategoryShare {
                category,
                total,
                percentage,
            }
        })
        .collect()
}

/// Largest single income or expense across the series; zero for an empty or idle year.
pub fn find_max_magnitude(series: &[MonthTotals]) -> Decimal {
    series
        .iter()
        .map(|m| m.income.max(m.expense))
        .fold(Decimal::ZERO, Decimal::max)
}

/// Scales `value` into `0..=full` relative to `max`. A zero `max` maps everything to 0.
pub fn scale_to_max(value: Decimal, max: Decimal, full: f64) -> f64 {
    if max <= Decimal::ZERO {
        return 0.0;
    }
    (value / max).to_f64().unwrap_or(0.0) * full
}

/// Sums of income and expense amounts in a list of transactions.
pub fn compute_period_totals(transactions: &[Transaction]) -> (Decimal, Decimal) {
    transactions
        .iter()
        .fold((Decimal::ZERO, Decimal::ZERO), |(income, expense), tx| {
            match tx.transaction_type {
                TransactionType::Income => (income.saturating_add(tx.amount), expense),
                TransactionType::Expense => (income, expense.saturating_add(tx.amount)),
            }
        })
}

/// Number of months in the series with any income or expense.
pub fn count_active_months(series: &[MonthTotals]) -> u32 {
    series.iter().filter(|m| m.has_activity()).count() as u32
}

pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn transaction(transaction_type: TransactionType, amount: &str) -> Transaction {
        Transaction {
            id: 1,
            description: "Test".to_string(),
            amount: dec(amount),
            category: Category::Other,
            transaction_type,
            year: 2025,
            month: 1,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_compute_balance() {
        assert_eq!(compute_balance(dec("1000"), dec("400")), dec("600"));
        assert_eq!(compute_balance(dec("100.50"), dec("250.75")), dec("-150.25"));
        assert_eq!(compute_balance(Decimal::ZERO, Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_compute_monthly_average_zero_months() {
        assert_eq!(compute_monthly_average(dec("1234.56"), 0), Decimal::ZERO);
        assert_eq!(compute_monthly_average(dec("-50"), 0), Decimal::ZERO);
    }

    #[test]
    fn test_compute_monthly_average() {
        assert_eq!(compute_monthly_average(Decimal::ZERO, 2), Decimal::ZERO);
        assert_eq!(compute_monthly_average(dec("900"), 3), dec("300"));
        assert_eq!(compute_monthly_average(dec("-100"), 4), dec("-25"));
    }

    #[test]
    fn test_compute_yearly_series_fills_missing_months() {
        let mut grouped = BTreeMap::new();
        grouped.insert(3, (dec("10"), dec("5")));
        grouped.insert(11, (Decimal::ZERO, dec("7.25")));

        let series = compute_yearly_series(&grouped);
        assert_eq!(series.len(), 12);
        for (idx, month) in series.iter().enumerate() {
            assert_eq!(month.month, idx as u32 + 1);
        }
        assert_eq!(series[2].income, dec("10"));
        assert_eq!(series[2].expense, dec("5"));
        assert_eq!(series[10].expense, dec("7.25"));
        assert_eq!(series[0], MonthTotals::empty(1));
    }

    #[test]
    fn test_compute_yearly_series_ignores_out_of_range() {
        let mut grouped = BTreeMap::new();
        grouped.insert(0, (dec("1"), dec("1")));
        grouped.insert(13, (dec("1"), dec("1")));

        let series = compute_yearly_series(&grouped);
        assert_eq!(series.len(), 12);
        assert!(series.iter().all(|m| !m.has_activity()));
    }

    #[test]
    fn test_compute_category_percentages_sum_to_hundred() {
        let totals = vec![
            (Category::Housing, dec("700")),
            (Category::Food, dec("200")),
            (Category::Leisure, dec("66.66")),
            (Category::Other, dec("33.34")),
        ];
        let shares = compute_category_percentages(&totals, dec("1000"));

        assert_eq!(shares.len(), 4);
        assert_eq!(shares[0].category, Category::Housing);
        assert!((shares[0].percentage - 70.0).abs() < 1e-9);
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1);
    }

    #[test]
    fn test_compute_category_percentages_thirds() {
        let totals = vec![
            (Category::Food, dec("1")),
            (Category::Transport, dec("1")),
            (Category::Health, dec("1")),
        ];
        let shares = compute_category_percentages(&totals, dec("3"));
        let sum: f64 = shares.iter().map(|s| s.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.1);
    }

    #[test]
    fn test_compute_category_percentages_single_category() {
        let shares = compute_category_percentages(&[(Category::Food, dec("42"))], dec("42"));
        assert_eq!(shares.len(), 1);
        assert!((shares[0].percentage - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_compute_category_percentages_zero_total() {
        let shares = compute_category_percentages(&[(Category::Food, dec("5"))], Decimal::ZERO);
        assert_eq!(shares[0].percentage, 0.0);

        assert!(compute_category_percentages(&[], Decimal::ZERO).is_empty());
        assert!(compute_category_percentages(&[], dec("10")).is_empty());
    }

    #[test]
    fn test_find_max_magnitude() {
        let mut series: Vec<MonthTotals> = (1..=12).map(MonthTotals::empty).collect();
        series[1].income = dec("300");
        series[6].expense = dec("450.10");
        assert_eq!(find_max_magnitude(&series), dec("450.10"));
    }

    #[test]
    fn test_find_max_magnitude_all_zero_and_empty() {
        let series: Vec<MonthTotals> = (1..=12).map(MonthTotals::empty).collect();
        let max = find_max_magnitude(&series);
        assert_eq!(max, Decimal::ZERO);
        assert!(series.iter().all(|m| scale_to_max(m.income, max, 120.0) == 0.0));
        assert!(series.iter().all(|m| scale_to_max(m.expense, max, 120.0) == 0.0));

        assert_eq!(find_max_magnitude(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_scale_to_max() {
        assert_eq!(scale_to_max(dec("50"), dec("200"), 120.0), 30.0);
        assert_eq!(scale_to_max(dec("200"), dec("200"), 40.0), 40.0);
        assert_eq!(scale_to_max(Decimal::ZERO, dec("200"), 40.0), 0.0);
    }

    #[test]
    fn test_compute_period_totals() {
        let transactions = vec![
            transaction(TransactionType::Income, "1000"),
            transaction(TransactionType::Expense, "250.50"),
            transaction(TransactionType::Expense, "49.50"),
        ];
        assert_eq!(compute_period_totals(&transactions), (dec("1000"), dec("300")));
        assert_eq!(compute_period_totals(&[]), (Decimal::ZERO, Decimal::ZERO));
    }

    #[test]
    fn test_compute_period_totals_saturates_instead_of_panicking() {
        let mut big = transaction(TransactionType::Income, "1");
        big.amount = Decimal::MAX;
        let totals = compute_period_totals(&[big.clone(), big]);
        assert_eq!(totals, (Decimal::MAX, Decimal::ZERO));
    }

    #[test]
    fn test_count_active_months() {
        let mut series: Vec<MonthTotals> = (1..=12).map(MonthTotals::empty).collect();
        assert_eq!(count_active_months(&series), 0);
        series[0].income = dec("1");
        series[5].expense = dec("2");
        assert_eq!(count_active_months(&series), 2);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), Some("Jan"));
        assert_eq!(month_name(12), Some("Dec"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }
}
