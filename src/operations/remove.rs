use crate::db::repository::TransactionStore;
use crate::error::{BudgetError, Result};

pub fn parse_transaction_id(id_input: &str) -> Result<i64> {
    let id_input = id_input.trim();
    if id_input.is_empty() {
        return Err(BudgetError::ValidationFailed(
            "Transaction ID cannot be empty.".to_string(),
        ));
    }

    id_input.parse::<i64>().map_err(|_| {
        BudgetError::ValidationFailed(format!(
            "Invalid transaction ID '{}'. Please provide a number.",
            id_input
        ))
    })
}

pub fn remove_transaction_from_db(store: &TransactionStore, id_input: &str) -> Result<()> {
    let id = parse_transaction_id(id_input)?;
    store.delete(id)
}
