//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use centavo_core::ledger::{Category, Transaction, TransactionType};
use centavo_core::storage::{
    CategoryRepository, DateRange, RepositoryError, Result, TransactionRepository,
};

/// In-memory storage backend for tests and the demo binary.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and is lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    transactions: Arc<RwLock<HashMap<Uuid, Transaction>>>,
    categories: Arc<RwLock<HashMap<Uuid, Category>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryRepository {
    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&id).cloned())
    }

    async fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut rows: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by_key(|tx| tx.date);
        Ok(rows)
    }

    async fn transactions_in_range(
        &self,
        user_id: Uuid,
        date_range: DateRange,
    ) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut rows: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.user_id == user_id && date_range.contains(tx.date))
            .cloned()
            .collect();
        rows.sort_by_key(|tx| tx.date);
        Ok(rows)
    }

    async fn count_for_category(&self, user_id: Uuid, category_id: Uuid) -> Result<usize> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|tx| tx.user_id == user_id && tx.category_id == category_id)
            .count())
    }

    async fn create_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        if transactions.contains_key(&transaction.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Transaction",
                id: transaction.id.to_string(),
            });
        }
        transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        if !transactions.contains_key(&transaction.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Transaction",
                id: transaction.id.to_string(),
            });
        }
        transactions.insert(transaction.id, transaction.clone());
        Ok(())
    }

    async fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        if transactions.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Transaction",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryRepository {
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.get(&id).cloned())
    }

    async fn categories_for_user(&self, user_id: Uuid) -> Result<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut rows: Vec<Category> = categories
            .values()
            .filter(|category| category.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn categories_of_type(
        &self,
        user_id: Uuid,
        kind: TransactionType,
    ) -> Result<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut rows: Vec<Category> = categories
            .values()
            .filter(|category| category.user_id == user_id && category.kind == kind)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(rows)
    }

    async fn create_category(&self, category: &Category) -> Result<()> {
        let mut categories = self.categories.write().await;
        if categories.contains_key(&category.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Category",
                id: category.id.to_string(),
            });
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(RepositoryError::NotFound {
                entity_type: "Category",
                id: category.id.to_string(),
            });
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> Result<()> {
        let mut categories = self.categories.write().await;
        if categories.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Category",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}
