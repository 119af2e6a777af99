use super::add::{create_transaction, format_details};
use super::remove::parse_transaction_id;
use crate::db::repository::TransactionStore;
use crate::error::Result;

/// Current details of a transaction, in the same line format the update expects.
pub fn current_transaction_details(store: &TransactionStore, id_input: &str) -> Result<String> {
    let id = parse_transaction_id(id_input)?;
    let existing = store.get(id)?;
    Ok(format_details(&existing.to_input()))
}

pub fn update_transaction_in_db(
    store: &TransactionStore,
    id_input: &str,
    details: &str,
) -> Result<()> {
    let id = parse_transaction_id(id_input)?;
    let input = create_transaction(details)?;
    store.update(id, &input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BudgetError;
    use crate::models::transaction::{Category, TransactionType};
    use crate::operations::add::add_transaction_to_db;
    use rust_decimal::Decimal;

    #[test]
    fn test_update_transaction_success() {
        let store = TransactionStore::in_memory();
        let id = add_transaction_to_db(&store, "2025-02, Cinema, 12, expense, Leisure").unwrap();

        update_transaction_in_db(
            &store,
            &id.to_string(),
            "2025-02, Cinema and dinner, 48.50, expense, Leisure",
        )
        .unwrap();

        let updated = store.get(id).unwrap();
        assert_eq!(updated.description, "Cinema and dinner");
        assert_eq!(updated.amount, Decimal::new(4850, 2));
        assert_eq!(updated.transaction_type, TransactionType::Expense);
        assert_eq!(updated.category, Category::Leisure);
    }

    #[test]
    fn test_update_transaction_not_found() {
        let store = TransactionStore::in_memory();
        let result = update_transaction_in_db(&store, "5", "2025-02, Cinema, 12, expense, Leisure");
        assert!(matches!(result, Err(BudgetError::NotFound { id: 5 })));
    }

    #[test]
    fn test_update_transaction_invalid_details_leave_record_untouched() {
        let store = TransactionStore::in_memory();
        let id = add_transaction_to_db(&store, "2025-02, Cinema, 12, expense, Leisure").unwrap();

        let result =
            update_transaction_in_db(&store, &id.to_string(), "2025-02, , 12, expense, Leisure");
        assert!(matches!(result, Err(BudgetError::ValidationFailed(_))));
        assert_eq!(store.get(id).unwrap().description, "Cinema");
    }

    #[test]
    fn test_current_transaction_details_prefills_update() {
        let store = TransactionStore::in_memory();
        let id =
            add_transaction_to_db(&store, "2025-06, Gym, pool, 35.5, expense, Health").unwrap();

        let details = current_transaction_details(&store, &id.to_string()).unwrap();
        assert!(details.starts_with("2025-06, Gym, pool, "));
        assert!(details.ends_with(", expense, Health"));
        assert_eq!(create_transaction(&details).unwrap().amount, Decimal::new(355, 1));

        update_transaction_in_db(&store, &id.to_string(), &details).unwrap();
        let unchanged = store.get(id).unwrap();
        assert_eq!(unchanged.description, "Gym, pool");
        assert_eq!(unchanged.amount, Decimal::new(355, 1));
    }

    #[test]
    fn test_current_transaction_details_unknown_id() {
        let store = TransactionStore::in_memory();
        assert!(matches!(
            current_transaction_details(&store, "9"),
            Err(BudgetError::NotFound { id: 9 })
        ));
        assert!(matches!(
            current_transaction_details(&store, "nine"),
            Err(BudgetError::ValidationFailed(_))
        ));
    }
}
