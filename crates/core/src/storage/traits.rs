use async_trait::async_trait;
use uuid::Uuid;

use crate::ledger::{Category, Transaction, TransactionType};

use super::{DateRange, Result};

/// Repository for transaction operations.
///
/// Every query filters by the owning user first; the user id is the
/// sole partition key of the remote store.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Gets a transaction by its ID.
    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>>;

    /// Gets all transactions owned by a user.
    async fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>>;

    /// Gets a user's transactions with dates inside an inclusive range.
    async fn transactions_in_range(
        &self,
        user_id: Uuid,
        date_range: DateRange,
    ) -> Result<Vec<Transaction>>;

    /// Counts a user's transactions referencing the given category.
    async fn count_for_category(&self, user_id: Uuid, category_id: Uuid) -> Result<usize>;

    /// Creates a new transaction.
    async fn create_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Updates an existing transaction.
    async fn update_transaction(&self, transaction: &Transaction) -> Result<()>;

    /// Deletes a transaction by its ID.
    async fn delete_transaction(&self, id: Uuid) -> Result<()>;
}

/// Repository for category operations.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Gets a category by its ID.
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>>;

    /// Gets all categories owned by a user.
    async fn categories_for_user(&self, user_id: Uuid) -> Result<Vec<Category>>;

    /// Gets a user's categories of one type.
    async fn categories_of_type(
        &self,
        user_id: Uuid,
        kind: TransactionType,
    ) -> Result<Vec<Category>>;

    /// Creates a new category.
    async fn create_category(&self, category: &Category) -> Result<()>;

    /// Updates an existing category.
    async fn update_category(&self, category: &Category) -> Result<()>;

    /// Deletes a category by its ID.
    async fn delete_category(&self, id: Uuid) -> Result<()>;
}

/// Combined trait for stores backing both collections.
pub trait LedgerStore: TransactionRepository + CategoryRepository {}

impl<T: TransactionRepository + CategoryRepository> LedgerStore for T {}
