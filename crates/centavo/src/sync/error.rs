use thiserror::Error;
use uuid::Uuid;

use centavo_core::cache::CacheError;
use centavo_core::ledger::{CategoryError, TransactionError};
use centavo_core::storage::RepositoryError;

/// Errors surfaced by ledger operations.
///
/// Validation failures are raised before any store call; store and
/// cache failures carry the underlying error. A failed mutation never
/// triggers invalidation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error(transparent)]
    InvalidTransaction(#[from] TransactionError),
    #[error(transparent)]
    InvalidCategory(#[from] CategoryError),
    #[error(transparent)]
    Store(#[from] RepositoryError),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error("Cannot delete category {id}: referenced by {references} transaction(s)")]
    CategoryInUse { id: Uuid, references: usize },
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_in_use_display() {
        let id = Uuid::nil();
        let error = LedgerError::CategoryInUse { id, references: 3 };
        assert_eq!(
            error.to_string(),
            format!("Cannot delete category {id}: referenced by 3 transaction(s)")
        );
    }

    #[test]
    fn test_validation_error_passes_through() {
        let error = LedgerError::from(TransactionError::NonPositiveAmount);
        assert_eq!(error.to_string(), "Amount must be positive");
    }
}
