use crate::db::repository::TransactionStore;
use crate::error::{BudgetError, Result};
use crate::models::transaction::{Category, TransactionInput, TransactionType};
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn add_transaction_to_db(store: &TransactionStore, details: &str) -> Result<i64> {
    let input = create_transaction(details)?;
    store.create(&input)
}

/// Parses `YYYY-MM, description, amount, income|expense, category`.
///
/// The description is everything between the first and the last three commas,
/// so it may contain commas itself.
pub fn create_transaction(details: &str) -> Result<TransactionInput> {
    let wrong_count = |got: usize| {
        BudgetError::ValidationFailed(format!(
            "Invalid number of details. Expected 5 details separated by commas, got {}",
            got
        ))
    };

    let (period, rest) = details.split_once(',').ok_or_else(|| wrong_count(1))?;
    let mut tail: Vec<&str> = rest.rsplitn(4, ',').map(|s| s.trim()).collect();
    if tail.len() != 4 {
        return Err(wrong_count(tail.len() + 1));
    }
    tail.reverse();
    let [description, amount_str, type_str, category_str] = [tail[0], tail[1], tail[2], tail[3]];

    let (year, month) = parse_period(period)?;

    let amount = Decimal::from_str(amount_str).map_err(|_| {
        BudgetError::ValidationFailed(format!(
            "Invalid amount format {}. Please provide a valid decimal number.",
            amount_str
        ))
    })?;

    let transaction_type = TransactionType::from_str(type_str)?;
    let category = Category::from_str(category_str)?;

    let input = TransactionInput::new(
        description,
        amount,
        category,
        transaction_type,
        year,
        month,
    );
    input.validate()?;
    Ok(input)
}

/// Formats a transaction as the detail line `create_transaction` reads.
pub fn format_details(input: &TransactionInput) -> String {
    format!(
        "{}-{:02}, {}, {}, {}, {}",
        input.year,
        input.month,
        input.description,
        input.amount,
        input.transaction_type,
        input.category
    )
}

/// Parses a `YYYY-MM` period. Any year is accepted; the month must be 1 to 12.
pub fn parse_period(text: &str) -> Result<(i32, u32)> {
    let invalid = || {
        BudgetError::ValidationFailed(format!(
            "Invalid period '{}'. Please use YYYY-MM.",
            text
        ))
    };

    let (year_str, month_str) = text.trim().rsplit_once('-').ok_or_else(invalid)?;
    let year = year_str.trim().parse::<i32>().map_err(|_| invalid())?;
    let month = month_str.trim().parse::<u32>().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}
