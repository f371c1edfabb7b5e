use thiserror::Error;

use super::types::TransactionType;

/// Errors that can occur when validating or manipulating transactions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Transaction title cannot be empty")]
    EmptyTitle,
    #[error("Transaction title too long (max 200 characters)")]
    TitleTooLong,
    #[error("Amount must be positive")]
    NonPositiveAmount,
    #[error("Unknown category: {0}")]
    UnknownCategory(String),
    #[error("Category belongs to a different user")]
    ForeignCategory,
    #[error("Category type {category} does not match transaction type {transaction}")]
    CategoryTypeMismatch {
        category: TransactionType,
        transaction: TransactionType,
    },
}

/// Errors that can occur when validating or manipulating categories.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category name cannot be empty")]
    EmptyName,
    #[error("Category name too long (max 100 characters)")]
    NameTooLong,
    #[error("A {kind} category named \"{name}\" already exists")]
    DuplicateName { name: String, kind: TransactionType },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_error_display() {
        assert_eq!(
            TransactionError::EmptyTitle.to_string(),
            "Transaction title cannot be empty"
        );
        assert_eq!(
            TransactionError::NonPositiveAmount.to_string(),
            "Amount must be positive"
        );
        assert_eq!(
            TransactionError::CategoryTypeMismatch {
                category: TransactionType::Income,
                transaction: TransactionType::Expense,
            }
            .to_string(),
            "Category type income does not match transaction type expense"
        );
    }

    #[test]
    fn test_category_error_display() {
        assert_eq!(
            CategoryError::EmptyName.to_string(),
            "Category name cannot be empty"
        );
        assert_eq!(
            CategoryError::DuplicateName {
                name: "Food".to_string(),
                kind: TransactionType::Expense,
            }
            .to_string(),
            "A expense category named \"Food\" already exists"
        );
    }
}
