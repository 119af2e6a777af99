use crate::db::connection::{establish_connection, establish_memory_connection};
use crate::error::{BudgetError, Result};
use crate::models::report::YearTotals;
use crate::models::transaction::{
    Category, MAX_AMOUNT_SCALE, Transaction, TransactionInput, TransactionType,
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use log::{debug, warn};
use once_cell::unsync::OnceCell;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use std::collections::BTreeMap;
use std::path::PathBuf;

const SELECT_COLUMNS: &str =
    "SELECT id, description, amount, category, type, year, month, created_at FROM transactions";

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Transaction collection backed by SQLite.
///
/// Construction never touches storage. The first operation opens the database
/// and creates the schema; every later call reuses that connection.
pub struct TransactionStore {
    location: Location,
    conn: OnceCell<Connection>,
}

impl TransactionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: Location::Memory,
            conn: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_initialized(&self) -> bool {
        self.conn.get().is_some()
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn.get_or_try_init(|| match &self.location {
            Location::File(path) => establish_connection(path),
            Location::Memory => establish_memory_connection(),
        })
    }

    pub fn create(&self, input: &TransactionInput) -> Result<i64> {
        input.validate()?;
        let conn = self.connection()?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        conn.execute(
            "INSERT INTO transactions (description, amount, category, type, year, month, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                input.description.trim(),
                amount_to_sql(input.amount)?,
                input.category.label(),
                input.transaction_type.as_str(),
                input.year,
                input.month,
                created_at,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!("Created transaction {} for {}-{:02}", id, input.year, input.month);
        Ok(id)
    }

    /// Replaces every editable field of the record. `id` and `created_at` are kept.
    pub fn update(&self, id: i64, input: &TransactionInput) -> Result<()> {
        input.validate()?;
        let conn = self.connection()?;

        let rows_affected = conn.execute(
            "UPDATE transactions
             SET description = ?1, amount = ?2, category = ?3, type = ?4, year = ?5, month = ?6
             WHERE id = ?7",
            params![
                input.description.trim(),
                amount_to_sql(input.amount)?,
                input.category.label(),
                input.transaction_type.as_str(),
                input.year,
                input.month,
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Err(BudgetError::NotFound { id });
        }
        debug!("Updated transaction {}", id);
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        let rows_affected = self
            .connection()?
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;

        if rows_affected == 0 {
            return Err(BudgetError::NotFound { id });
        }
        debug!("Deleted transaction {}", id);
        Ok(())
    }

    pub fn get(&self, id: i64) -> Result<Transaction> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        self.connection()?
            .query_row(&sql, [id], row_to_transaction)
            .optional()?
            .ok_or(BudgetError::NotFound { id })
    }

    /// All transactions of one month, newest first.
    pub fn query_by_period(&self, year: i32, month: u32) -> Result<Vec<Transaction>> {
        debug!("Querying transactions for {}-{:02}", year, month);
        let sql = format!(
            "{} WHERE year = ?1 AND month = ?2 ORDER BY created_at DESC, id DESC",
            SELECT_COLUMNS
        );
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![year, month], row_to_transaction)?;

        let mut transactions = Vec::new();
        for transaction in rows {
            transactions.push(transaction?);
        }
        Ok(transactions)
    }

    /// Income and expense sums per month. Always holds exactly the months 1 through 12.
    pub fn query_year_grouped(&self, year: i32) -> Result<BTreeMap<u32, (Decimal, Decimal)>> {
        debug!("Querying monthly totals for {}", year);
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT
                month,
                IFNULL(SUM(CASE WHEN type = 'income' THEN amount ELSE 0.0 END), 0.0),
                IFNULL(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0.0 END), 0.0)
             FROM transactions
             WHERE year = ?1
             GROUP BY month
             ORDER BY month",
        )?;
        let rows = stmt.query_map([year], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                decimal_from_sql(row.get(1)?, 1)?,
                decimal_from_sql(row.get(2)?, 2)?,
            ))
        })?;

        let mut grouped: BTreeMap<u32, (Decimal, Decimal)> = (1..=12)
            .map(|month| (month, (Decimal::ZERO, Decimal::ZERO)))
            .collect();
        for row in rows {
            let (month, income, expense) = row?;
            match u32::try_from(month) {
                Ok(m) if (1..=12).contains(&m) => {
                    grouped.insert(m, (income, expense));
                }
                _ => warn!("Ignoring totals for out-of-range month {} in {}", month, year),
            }
        }
        Ok(grouped)
    }

    /// Expense totals per category for the year, largest first. Categories without
    /// expenses are left out.
    pub fn query_category_totals(&self, year: i32) -> Result<Vec<(Category, Decimal)>> {
        debug!("Querying category totals for {}", year);
        let conn = self.connection()?;
        let mut stmt = conn.prepare(
            "SELECT category, SUM(amount) AS total
             FROM transactions
             WHERE year = ?1 AND type = 'expense'
             GROUP BY category
             HAVING total > 0
             ORDER BY total DESC, category ASC",
        )?;
        let rows = stmt.query_map([year], |row| {
            let label: String = row.get(0)?;
            let category = label.parse::<Category>().map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e))
            })?;
            Ok((category, decimal_from_sql(row.get(1)?, 1)?))
        })?;

        let mut totals = Vec::new();
        for row in rows {
            totals.push(row?);
        }
        Ok(totals)
    }

    pub fn query_summary(&self, year: i32) -> Result<YearTotals> {
        debug!("Querying summary for {}", year);
        let totals = self.connection()?.query_row(
            "SELECT
                IFNULL(SUM(CASE WHEN type = 'income' THEN amount ELSE 0.0 END), 0.0),
                IFNULL(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0.0 END), 0.0),
                COUNT(DISTINCT month)
             FROM transactions
             WHERE year = ?1",
            [year],
            |row| {
                Ok(YearTotals {
                    total_income: decimal_from_sql(row.get(0)?, 0)?,
                    total_expense: decimal_from_sql(row.get(1)?, 1)?,
                    active_months: row.get(2)?,
                })
            },
        )?;
        Ok(totals)
    }
}

fn amount_to_sql(amount: Decimal) -> Result<f64> {
    amount.to_f64().ok_or_else(|| {
        BudgetError::ValidationFailed(format!("Amount {} cannot be stored", amount))
    })
}

// Amounts are validated to at most MAX_AMOUNT_SCALE places, so rounding the
// REAL column back to that scale recovers the exact value.
fn decimal_from_sql(value: f64, column: usize) -> rusqlite::Result<Decimal> {
    Decimal::from_f64(value)
        .map(|d| d.round_dp(MAX_AMOUNT_SCALE))
        .ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                Type::Real,
                format!("'{}' is not a valid amount", value).into(),
            )
        })
}

fn parse_created_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            // SQLite's CURRENT_TIMESTAMP default
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|n| n.and_utc())
                .ok()
        })
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let category_str: String = row.get(3)?;
    let type_str: String = row.get(4)?;
    let created_at_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: decimal_from_sql(row.get(2)?, 2)?,
        category: category_str
            .parse::<Category>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?,
        transaction_type: type_str
            .parse::<TransactionType>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?,
        year: row.get(5)?,
        month: row.get(6)?,
        created_at: parse_created_at(&created_at_str).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                7,
                Type::Text,
                format!("Invalid timestamp '{}'", created_at_str).into(),
            )
        })?,
    })
}
