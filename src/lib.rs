//! Personal budget tracking: a SQLite transaction store plus the aggregation
//! that turns dated, categorized transactions into monthly and yearly reports.
//!
//! The store (`db`) owns persistence, `engine` holds the pure arithmetic, and
//! `operations` composes the two into the read and write surface a front-end uses.

pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod models;
pub mod operations;

pub use db::repository::TransactionStore;
pub use error::{BudgetError, Result};
pub use models::report::{CategoryBreakdown, HomeSummary, MonthlyDetail, YearlySeries};
pub use models::transaction::{Category, Transaction, TransactionInput, TransactionType};
