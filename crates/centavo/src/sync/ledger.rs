//! The per-user ledger session.
//!
//! [`Ledger`] wires the fetch and mutation paths together: reads go
//! through the query cache under the key taxonomy, mutations validate
//! locally, write to the store, and only then invalidate the affected
//! keys. The store and cache are injected, so tests run each case
//! against its own instances.

use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use tokio::sync::broadcast;
use uuid::Uuid;

use centavo_core::cache::{CacheError, QueryKey, SyncEvent};
use centavo_core::ledger::{
    expense_distribution, summarize, table_rows, validate_category, validate_category_reference,
    validate_transaction, Category, CategorySlice, CreateCategoryRequest,
    CreateTransactionRequest, LedgerTotals, Transaction, TransactionRow, TransactionType,
    UpdateCategoryRequest, UpdateTransactionRequest,
};
use centavo_core::storage::{LedgerStore, MonthKey, RepositoryError};

use crate::cache::{CachePolicy, QueryCache, RefreshTrigger};

use super::error::{LedgerError, Result};
use super::invalidation::{invalidation_targets, LedgerMutation};

/// A user's synchronized view of their transactions and categories.
///
/// Cheap to clone; clones share the store and cache.
pub struct Ledger<R> {
    store: Arc<R>,
    cache: QueryCache,
    user_id: Uuid,
}

impl<R> Clone for Ledger<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            cache: self.cache.clone(),
            user_id: self.user_id,
        }
    }
}

impl<R> Ledger<R>
where
    R: LedgerStore + 'static,
{
    /// Creates a session for `user_id` with the default cache policy.
    pub fn new(store: Arc<R>, user_id: Uuid) -> Self {
        Self::with_policy(store, user_id, CachePolicy::default())
    }

    /// Creates a session with an explicit cache policy.
    pub fn with_policy(store: Arc<R>, user_id: Uuid, policy: CachePolicy) -> Self {
        Self {
            store,
            cache: QueryCache::new(policy),
            user_id,
        }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Subscribes to cache state transitions.
    pub fn events(&self) -> broadcast::Receiver<SyncEvent> {
        self.cache.events()
    }

    /// Propagates an external refetch trigger (window focus, tab
    /// visibility, reconnect) to the cache.
    pub async fn refresh(&self, trigger: RefreshTrigger) -> usize {
        self.cache.refresh(trigger).await
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// All of the user's transactions, cached under the unscoped key.
    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        let key = QueryKey::transactions(self.user_id);
        let store = self.store.clone();
        let user_id = self.user_id;
        self.cache
            .fetch_with(&key, move || {
                let store = store.clone();
                async move {
                    store
                        .transactions_for_user(user_id)
                        .await
                        .map_err(store_fetch_error)
                }
            })
            .await
            .map_err(Into::into)
    }

    /// The user's transactions for one calendar month.
    pub async fn monthly_transactions(&self, month: MonthKey) -> Result<Vec<Transaction>> {
        let key = QueryKey::monthly_transactions(self.user_id, month);
        let store = self.store.clone();
        let user_id = self.user_id;
        self.cache
            .fetch_with(&key, move || {
                let store = store.clone();
                async move {
                    store
                        .transactions_in_range(user_id, month.range())
                        .await
                        .map_err(store_fetch_error)
                }
            })
            .await
            .map_err(Into::into)
    }

    /// All of the user's categories, sorted by name.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let key = QueryKey::categories(self.user_id);
        let store = self.store.clone();
        let user_id = self.user_id;
        self.cache
            .fetch_with(&key, move || {
                let store = store.clone();
                async move {
                    store
                        .categories_for_user(user_id)
                        .await
                        .map_err(store_fetch_error)
                }
            })
            .await
            .map_err(Into::into)
    }

    /// The user's categories of one type, sorted by name.
    pub async fn categories_of(&self, kind: TransactionType) -> Result<Vec<Category>> {
        let key = QueryKey::categories_of(self.user_id, kind);
        let store = self.store.clone();
        let user_id = self.user_id;
        self.cache
            .fetch_with(&key, move || {
                let store = store.clone();
                async move {
                    store
                        .categories_of_type(user_id, kind)
                        .await
                        .map_err(store_fetch_error)
                }
            })
            .await
            .map_err(Into::into)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    /// Income, expenses, and balance for one month.
    pub async fn monthly_totals(&self, month: MonthKey) -> Result<LedgerTotals> {
        Ok(summarize(&self.monthly_transactions(month).await?))
    }

    /// Income, expenses, and balance over all time.
    pub async fn overall_totals(&self) -> Result<LedgerTotals> {
        Ok(summarize(&self.transactions().await?))
    }

    /// Category-wise expense distribution for one month.
    pub async fn monthly_expense_distribution(
        &self,
        month: MonthKey,
    ) -> Result<Vec<CategorySlice>> {
        let transactions = self.monthly_transactions(month).await?;
        let categories = self.categories().await?;
        Ok(expense_distribution(&transactions, &categories))
    }

    /// All transactions joined with category names, newest first.
    pub async fn transaction_table(&self) -> Result<Vec<TransactionRow>> {
        let transactions = self.transactions().await?;
        let categories = self.categories().await?;
        Ok(table_rows(&transactions, &categories))
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Records a new transaction: validate, write, invalidate.
    pub async fn record_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<Transaction> {
        let transaction = request.into_transaction(self.user_id);
        validate_transaction(&transaction)?;
        let category = self.store.get_category(transaction.category_id).await?;
        validate_category_reference(&transaction, category.as_ref())?;

        self.store.create_transaction(&transaction).await?;
        tracing::info!(
            transaction_id = %transaction.id,
            user_id = %self.user_id,
            kind = %transaction.kind,
            date = %transaction.date,
            "Transaction recorded"
        );

        self.apply(LedgerMutation::transaction(
            self.user_id,
            MonthKey::of(transaction.date),
        ))
        .await;
        Ok(transaction)
    }

    /// Updates a transaction. When the date moves across months, both
    /// the old and the new month views are invalidated.
    pub async fn update_transaction(
        &self,
        id: Uuid,
        request: UpdateTransactionRequest,
    ) -> Result<Transaction> {
        let existing = self.owned_transaction(id).await?;
        let previous_month = MonthKey::of(existing.date);

        let mut updated = request.apply_to(existing);
        updated.updated_at = Some(Utc::now());
        validate_transaction(&updated)?;
        let category = self.store.get_category(updated.category_id).await?;
        validate_category_reference(&updated, category.as_ref())?;

        self.store.update_transaction(&updated).await?;
        tracing::info!(
            transaction_id = %updated.id,
            user_id = %self.user_id,
            date = %updated.date,
            "Transaction updated"
        );

        self.apply(LedgerMutation::transaction_update(
            self.user_id,
            MonthKey::of(updated.date),
            previous_month,
        ))
        .await;
        Ok(updated)
    }

    /// Deletes a transaction.
    pub async fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let existing = self.owned_transaction(id).await?;

        self.store.delete_transaction(id).await?;
        tracing::info!(
            transaction_id = %id,
            user_id = %self.user_id,
            "Transaction deleted"
        );

        self.apply(LedgerMutation::transaction(
            self.user_id,
            MonthKey::of(existing.date),
        ))
        .await;
        Ok(())
    }

    /// Creates a new category.
    pub async fn create_category(&self, request: CreateCategoryRequest) -> Result<Category> {
        let category = request.into_category(self.user_id);
        let existing = self.store.categories_for_user(self.user_id).await?;
        validate_category(&category, &existing)?;

        self.store.create_category(&category).await?;
        tracing::info!(
            category_id = %category.id,
            user_id = %self.user_id,
            name = %category.name,
            kind = %category.kind,
            "Category created"
        );

        self.apply(LedgerMutation::category(self.user_id, category.kind))
            .await;
        Ok(category)
    }

    /// Updates a category's name or type.
    pub async fn update_category(
        &self,
        id: Uuid,
        request: UpdateCategoryRequest,
    ) -> Result<Category> {
        let existing = self.owned_category(id).await?;
        let previous_kind = existing.kind;

        let updated = request.apply_to(existing);
        let all = self.store.categories_for_user(self.user_id).await?;
        validate_category(&updated, &all)?;

        self.store.update_category(&updated).await?;
        tracing::info!(
            category_id = %updated.id,
            user_id = %self.user_id,
            name = %updated.name,
            "Category updated"
        );

        self.apply(LedgerMutation::category(self.user_id, updated.kind))
            .await;
        if previous_kind != updated.kind {
            self.apply(LedgerMutation::category(self.user_id, previous_kind))
                .await;
        }
        Ok(updated)
    }

    /// Deletes a category, refusing while any transaction references it.
    /// A refused delete performs no invalidation.
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let existing = self.owned_category(id).await?;

        let references = self.store.count_for_category(self.user_id, id).await?;
        if references > 0 {
            tracing::warn!(
                category_id = %id,
                user_id = %self.user_id,
                references,
                "Refusing to delete category still in use"
            );
            return Err(LedgerError::CategoryInUse { id, references });
        }

        self.store.delete_category(id).await?;
        tracing::info!(
            category_id = %id,
            user_id = %self.user_id,
            "Category deleted"
        );

        self.apply(LedgerMutation::category(self.user_id, existing.kind))
            .await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Marks every key the mutation affects as stale. Called only after
    /// the store acknowledged the write.
    async fn apply(&self, mutation: LedgerMutation) {
        for key in invalidation_targets(&mutation, today()) {
            self.cache.invalidate(&key).await;
        }
    }

    /// Loads a transaction, hiding rows owned by other users.
    async fn owned_transaction(&self, id: Uuid) -> Result<Transaction> {
        let transaction = self.store.get_transaction(id).await?;
        transaction
            .filter(|tx| tx.user_id == self.user_id)
            .ok_or_else(|| {
                LedgerError::Store(RepositoryError::NotFound {
                    entity_type: "Transaction",
                    id: id.to_string(),
                })
            })
    }

    /// Loads a category, hiding rows owned by other users.
    async fn owned_category(&self, id: Uuid) -> Result<Category> {
        let category = self.store.get_category(id).await?;
        category
            .filter(|category| category.user_id == self.user_id)
            .ok_or_else(|| {
                LedgerError::Store(RepositoryError::NotFound {
                    entity_type: "Category",
                    id: id.to_string(),
                })
            })
    }
}

/// Wall-clock date used for the always-invalidated current-month key.
fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Read failures travel through the cache as fetch errors so the cache
/// can record and rebroadcast them; the typed repository error is
/// preserved in the message.
fn store_fetch_error(error: RepositoryError) -> CacheError {
    CacheError::FetchFailed(error.to_string())
}
