use thiserror::Error;

pub type Result<T> = std::result::Result<T, BudgetError>;

#[derive(Error, Debug)]
pub enum BudgetError {
    /// Backing database could not be opened, initialized or queried
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Transaction with ID {id} not found")]
    NotFound { id: i64 },

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<rusqlite::Error> for BudgetError {
    fn from(e: rusqlite::Error) -> Self {
        BudgetError::StorageUnavailable(e.to_string())
    }
}
