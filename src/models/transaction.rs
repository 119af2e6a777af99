use crate::error::{BudgetError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

pub const MAX_DESCRIPTION_LEN: usize = 255;
pub const MAX_AMOUNT_SCALE: u32 = 2;
/// Largest single amount accepted, 1e12 written as its 96-bit parts. Amounts are
/// stored as REAL, and below this bound they read back exact to the cent.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(BudgetError::ValidationFailed(format!(
                "Invalid transaction type '{}'. Use 'income' or 'expense'.",
                other
            ))),
        }
    }
}

/// The closed set of categories a transaction can be filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Category {
    Salary,
    ExtraIncome,
    Food,
    Transport,
    Housing,
    Utilities,
    Leisure,
    Health,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Salary,
        Category::ExtraIncome,
        Category::Food,
        Category::Transport,
        Category::Housing,
        Category::Utilities,
        Category::Leisure,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Salary => "Salary",
            Category::ExtraIncome => "Extra Income",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Leisure => "Leisure",
            Category::Health => "Health",
            Category::Education => "Education",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Category {
    type Err = BudgetError;

    // Matches the display label case-insensitively, so "extra income" is accepted too
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BudgetError::ValidationFailed(format!("Unknown category '{}'", wanted)))
    }
}

/// Caller-supplied fields of a transaction. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionInput {
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    pub transaction_type: TransactionType,
    pub year: i32,
    pub month: u32,
}

impl TransactionInput {
    pub fn new(
        description: impl Into<String>,
        amount: Decimal,
        category: Category,
        transaction_type: TransactionType,
        year: i32,
        month: u32,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            transaction_type,
            year,
            month,
        }
    }

    /// Checks the write-path invariants. Year is deliberately unconstrained.
    pub fn validate(&self) -> Result<()> {
        if self.description.trim().is_empty() {
            return Err(BudgetError::ValidationFailed("Description cannot be empty".to_string()));
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(BudgetError::ValidationFailed(format!(
                "Description too long (max {} characters)",
                MAX_DESCRIPTION_LEN
            )));
        }
        if self.amount <= Decimal::ZERO {
            return Err(BudgetError::ValidationFailed(format!(
                "Amount must be positive, got {}",
                self.amount
            )));
        }
        if self.amount > MAX_AMOUNT {
            return Err(BudgetError::ValidationFailed(format!(
                "Amount {} exceeds the maximum of {}",
                self.amount, MAX_AMOUNT
            )));
        }
        if self.amount.normalize().scale() > MAX_AMOUNT_SCALE {
            return Err(BudgetError::ValidationFailed(format!(
                "Amount {} has more than {} decimal places",
                self.amount, MAX_AMOUNT_SCALE
            )));
        }
        if !(1..=12).contains(&self.month) {
            return Err(BudgetError::ValidationFailed(format!(
                "Month must be between 1 and 12, got {}",
                self.month
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub category: Category,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub year: i32,
    pub month: u32,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// The editable fields of this record, e.g. to prefill an update.
    pub fn to_input(&self) -> TransactionInput {
        TransactionInput {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category,
            transaction_type: self.transaction_type,
            year: self.year,
            month: self.month,
        }
    }
}
