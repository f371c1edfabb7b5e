use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::{CategoryError, TransactionError};
use super::types::{Category, Transaction, TransactionType};

/// Filters transactions by owning user.
pub fn filter_transactions_by_user(transactions: &[Transaction], user_id: Uuid) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.user_id == user_id)
        .collect()
}

/// Filters transactions falling inside an inclusive date window.
pub fn filter_transactions_by_dates(
    transactions: &[Transaction],
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|tx| tx.date >= start && tx.date <= end)
        .collect()
}

/// Validates a transaction before creation or update.
///
/// Amount and title checks run before any store call; category
/// cross-checks are done separately via [`validate_category_reference`]
/// because they need the referenced category loaded.
pub fn validate_transaction(transaction: &Transaction) -> Result<(), TransactionError> {
    if transaction.title.trim().is_empty() {
        return Err(TransactionError::EmptyTitle);
    }
    if transaction.title.len() > 200 {
        return Err(TransactionError::TitleTooLong);
    }
    if transaction.amount <= Decimal::ZERO {
        return Err(TransactionError::NonPositiveAmount);
    }
    Ok(())
}

/// Validates that a transaction's category reference is usable: the
/// category exists, belongs to the same user, and has a matching type.
pub fn validate_category_reference(
    transaction: &Transaction,
    category: Option<&Category>,
) -> Result<(), TransactionError> {
    let Some(category) = category else {
        return Err(TransactionError::UnknownCategory(
            transaction.category_id.to_string(),
        ));
    };
    if category.user_id != transaction.user_id {
        return Err(TransactionError::ForeignCategory);
    }
    if category.kind != transaction.kind {
        return Err(TransactionError::CategoryTypeMismatch {
            category: category.kind,
            transaction: transaction.kind,
        });
    }
    Ok(())
}

/// Validates a category before creation or update.
///
/// `existing` is the user's current category list; name uniqueness per
/// user and type is a convention enforced here, not by the store.
pub fn validate_category(category: &Category, existing: &[Category]) -> Result<(), CategoryError> {
    if category.name.trim().is_empty() {
        return Err(CategoryError::EmptyName);
    }
    if category.name.len() > 100 {
        return Err(CategoryError::NameTooLong);
    }
    let duplicate = existing.iter().any(|other| {
        other.id != category.id
            && other.kind == category.kind
            && other.name.eq_ignore_ascii_case(&category.name)
    });
    if duplicate {
        return Err(CategoryError::DuplicateName {
            name: category.name.clone(),
            kind: category.kind,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn test_user() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
    }

    fn other_user() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-000000000002").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn expense(title: &str, amount: &str, category: &Category) -> Transaction {
        Transaction::new(
            test_user(),
            TransactionType::Expense,
            title,
            dec(amount),
            category.id,
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        )
    }

    #[test]
    fn test_validate_transaction_accepts_well_formed() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "500.00", &category);
        assert_eq!(validate_transaction(&tx), Ok(()));
    }

    #[test]
    fn test_validate_transaction_rejects_empty_title() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("   ", "500.00", &category);
        assert_eq!(validate_transaction(&tx), Err(TransactionError::EmptyTitle));
    }

    #[test]
    fn test_validate_transaction_rejects_long_title() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense(&"x".repeat(201), "500.00", &category);
        assert_eq!(validate_transaction(&tx), Err(TransactionError::TitleTooLong));
    }

    #[test]
    fn test_validate_transaction_rejects_zero_amount() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "0", &category);
        assert_eq!(
            validate_transaction(&tx),
            Err(TransactionError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_validate_transaction_rejects_negative_amount() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "-10.50", &category);
        assert_eq!(
            validate_transaction(&tx),
            Err(TransactionError::NonPositiveAmount)
        );
    }

    #[test]
    fn test_category_reference_unknown() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "500.00", &category);
        assert!(matches!(
            validate_category_reference(&tx, None),
            Err(TransactionError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_category_reference_foreign_user() {
        let category = Category::new(other_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "500.00", &category);
        assert_eq!(
            validate_category_reference(&tx, Some(&category)),
            Err(TransactionError::ForeignCategory)
        );
    }

    #[test]
    fn test_category_reference_type_mismatch() {
        let category = Category::new(test_user(), "Salary", TransactionType::Income);
        let tx = expense("Groceries", "500.00", &category);
        assert_eq!(
            validate_category_reference(&tx, Some(&category)),
            Err(TransactionError::CategoryTypeMismatch {
                category: TransactionType::Income,
                transaction: TransactionType::Expense,
            })
        );
    }

    #[test]
    fn test_category_reference_accepts_matching() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let tx = expense("Groceries", "500.00", &category);
        assert_eq!(validate_category_reference(&tx, Some(&category)), Ok(()));
    }

    #[test]
    fn test_validate_category_rejects_empty_name() {
        let category = Category::new(test_user(), "  ", TransactionType::Expense);
        assert_eq!(validate_category(&category, &[]), Err(CategoryError::EmptyName));
    }

    #[test]
    fn test_validate_category_rejects_duplicate_name() {
        let existing = Category::new(test_user(), "Food", TransactionType::Expense);
        let duplicate = Category::new(test_user(), "food", TransactionType::Expense);
        assert!(matches!(
            validate_category(&duplicate, std::slice::from_ref(&existing)),
            Err(CategoryError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_validate_category_allows_same_name_other_type() {
        let existing = Category::new(test_user(), "Misc", TransactionType::Expense);
        let income = Category::new(test_user(), "Misc", TransactionType::Income);
        assert_eq!(
            validate_category(&income, std::slice::from_ref(&existing)),
            Ok(())
        );
    }

    #[test]
    fn test_validate_category_allows_update_of_itself() {
        let mut category = Category::new(test_user(), "Food", TransactionType::Expense);
        let existing = vec![category.clone()];
        category.name = "Food".to_string();
        assert_eq!(validate_category(&category, &existing), Ok(()));
    }

    #[test]
    fn test_filters() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        let mut mine = expense("Groceries", "500.00", &category);
        mine.date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let mut theirs = expense("Rent", "900.00", &category);
        theirs.user_id = other_user();
        let mut later = expense("Cinema", "20.00", &category);
        later.date = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();

        let all = vec![mine.clone(), theirs, later];
        assert_eq!(filter_transactions_by_user(&all, test_user()).len(), 2);

        let july = filter_transactions_by_dates(
            &all,
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        );
        assert_eq!(july.len(), 2);
        assert!(july.iter().all(|tx| tx.date.to_string().starts_with("2024-07")));
    }
}
