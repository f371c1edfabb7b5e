//! SQLite repository implementation.
//!
//! Implements the repository traits from `centavo_core::storage` over
//! `tokio_rusqlite`.

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use centavo_core::ledger::{Category, Transaction, TransactionType};
use centavo_core::storage::{
    CategoryRepository, DateRange, RepositoryError, Result, TransactionRepository,
};

use super::conversions::{
    format_amount, format_date, format_datetime, row_to_category, row_to_transaction,
};
use super::error::map_storage_error;
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for both collections.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file is created if it doesn't exist and schema
    /// tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing; data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES).map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl TransactionRepository for SqliteRepository {
    async fn get_transaction(&self, id: Uuid) -> Result<Option<Transaction>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TRANSACTION_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_transaction) {
                    Ok(transaction) => Ok(Some(transaction)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Transaction", id.to_string()))
    }

    async fn transactions_for_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TRANSACTIONS_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_transaction)
                    .map_err(wrap_err)?;

                let mut transactions = Vec::new();
                for row_result in rows {
                    transactions.push(row_result.map_err(wrap_err)?);
                }
                Ok(transactions)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn transactions_in_range(
        &self,
        user_id: Uuid,
        date_range: DateRange,
    ) -> Result<Vec<Transaction>> {
        let user_id_str = user_id.to_string();
        let start_str = format_date(&date_range.start);
        let end_str = format_date(&date_range.end);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TRANSACTIONS_BY_USER_AND_DATE_RANGE)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str, &start_str, &end_str], row_to_transaction)
                    .map_err(wrap_err)?;

                let mut transactions = Vec::new();
                for row_result in rows {
                    transactions.push(row_result.map_err(wrap_err)?);
                }
                Ok(transactions)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn count_for_category(&self, user_id: Uuid, category_id: Uuid) -> Result<usize> {
        let user_id_str = user_id.to_string();
        let category_id_str = category_id.to_string();

        self.conn
            .call(move |conn| {
                let count: i64 = conn
                    .query_row(
                        schema::COUNT_TRANSACTIONS_BY_USER_AND_CATEGORY,
                        [&user_id_str, &category_id_str],
                        |row| row.get(0),
                    )
                    .map_err(wrap_err)?;
                Ok(count as usize)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_transaction(&self, transaction: &Transaction) -> Result<()> {
        let id = transaction.id.to_string();
        let user_id = transaction.user_id.to_string();
        let kind = transaction.kind.as_str().to_string();
        let title = transaction.title.clone();
        let amount = format_amount(&transaction.amount);
        let category_id = transaction.category_id.to_string();
        let date = format_date(&transaction.date);
        let description = transaction.description.clone();
        let created_at = format_datetime(&transaction.created_at);
        let updated_at = transaction.updated_at.as_ref().map(format_datetime);
        let transaction_id = transaction.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TRANSACTION,
                    rusqlite::params![
                        id,
                        user_id,
                        kind,
                        title,
                        amount,
                        category_id,
                        date,
                        description,
                        created_at,
                        updated_at
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_storage_error(e, "Transaction", transaction_id))
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        let id = transaction.id.to_string();
        let kind = transaction.kind.as_str().to_string();
        let title = transaction.title.clone();
        let amount = format_amount(&transaction.amount);
        let category_id = transaction.category_id.to_string();
        let date = format_date(&transaction.date);
        let description = transaction.description.clone();
        let updated_at = transaction.updated_at.as_ref().map(format_datetime);
        let transaction_id = transaction.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TRANSACTION,
                        rusqlite::params![
                            id,
                            kind,
                            title,
                            amount,
                            category_id,
                            date,
                            description,
                            updated_at
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Transaction", transaction_id))
    }

    async fn delete_transaction(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_TRANSACTION, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Transaction", id.to_string()))
    }
}

#[async_trait]
impl CategoryRepository for SqliteRepository {
    async fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CATEGORY_BY_ID)
                    .map_err(wrap_err)?;
                match stmt.query_row([&id_str], row_to_category) {
                    Ok(category) => Ok(Some(category)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Category", id.to_string()))
    }

    async fn categories_for_user(&self, user_id: Uuid) -> Result<Vec<Category>> {
        let user_id_str = user_id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CATEGORIES_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str], row_to_category)
                    .map_err(wrap_err)?;

                let mut categories = Vec::new();
                for row_result in rows {
                    categories.push(row_result.map_err(wrap_err)?);
                }
                Ok(categories)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn categories_of_type(
        &self,
        user_id: Uuid,
        kind: TransactionType,
    ) -> Result<Vec<Category>> {
        let user_id_str = user_id.to_string();
        let kind_str = kind.as_str().to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CATEGORIES_BY_USER_AND_KIND)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&user_id_str, &kind_str], row_to_category)
                    .map_err(wrap_err)?;

                let mut categories = Vec::new();
                for row_result in rows {
                    categories.push(row_result.map_err(wrap_err)?);
                }
                Ok(categories)
            })
            .await
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }

    async fn create_category(&self, category: &Category) -> Result<()> {
        let id = category.id.to_string();
        let user_id = category.user_id.to_string();
        let name = category.name.clone();
        let kind = category.kind.as_str().to_string();
        let created_at = format_datetime(&category.created_at);
        let category_id = category.id.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_CATEGORY,
                    rusqlite::params![id, user_id, name, kind, created_at],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_storage_error(e, "Category", category_id))
    }

    async fn update_category(&self, category: &Category) -> Result<()> {
        let id = category.id.to_string();
        let name = category.name.clone();
        let kind = category.kind.as_str().to_string();
        let category_id = category.id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_CATEGORY, rusqlite::params![id, name, kind])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Category", category_id))
    }

    async fn delete_category(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_CATEGORY, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_storage_error(e, "Category", id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn test_user() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn repo_with_category() -> (SqliteRepository, Category) {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        let category = Category::new(test_user(), "Food", TransactionType::Expense);
        repo.create_category(&category).await.unwrap();
        (repo, category)
    }

    fn expense(category: &Category, title: &str, date: NaiveDate) -> Transaction {
        Transaction::new(
            test_user(),
            TransactionType::Expense,
            title,
            dec("123.45"),
            category.id,
            date,
        )
    }

    #[tokio::test]
    async fn test_transaction_roundtrip() {
        let (repo, category) = repo_with_category().await;
        let tx = expense(
            &category,
            "Groceries",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        )
        .with_description("weekly shop");

        repo.create_transaction(&tx).await.unwrap();
        let fetched = repo.get_transaction(tx.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, tx.title);
        assert_eq!(fetched.amount, tx.amount);
        assert_eq!(fetched.date, tx.date);
        assert_eq!(fetched.description, tx.description);
        assert_eq!(fetched.kind, tx.kind);
        assert!(fetched.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_get_missing_transaction_returns_none() {
        let (repo, _) = repo_with_category().await;
        assert_eq!(repo.get_transaction(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_already_exists() {
        let (repo, category) = repo_with_category().await;
        let tx = expense(
            &category,
            "Groceries",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        );

        repo.create_transaction(&tx).await.unwrap();
        let result = repo.create_transaction(&tx).await;

        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { .. })
        ));
    }

    #[tokio::test]
    async fn test_range_query_filters_month() {
        let (repo, category) = repo_with_category().await;

        repo.create_transaction(&expense(
            &category,
            "June",
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        ))
        .await
        .unwrap();
        repo.create_transaction(&expense(
            &category,
            "July",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        ))
        .await
        .unwrap();

        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 7, 31).unwrap(),
        )
        .unwrap();
        let july = repo.transactions_in_range(test_user(), range).await.unwrap();

        assert_eq!(july.len(), 1);
        assert_eq!(july[0].title, "July");
    }

    #[tokio::test]
    async fn test_count_for_category() {
        let (repo, category) = repo_with_category().await;
        repo.create_transaction(&expense(
            &category,
            "Groceries",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        ))
        .await
        .unwrap();

        assert_eq!(
            repo.count_for_category(test_user(), category.id).await.unwrap(),
            1
        );
        assert_eq!(
            repo.count_for_category(test_user(), Uuid::new_v4()).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_update_transaction_persists_changes() {
        let (repo, category) = repo_with_category().await;
        let mut tx = expense(
            &category,
            "Groceries",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        );
        repo.create_transaction(&tx).await.unwrap();

        tx.date = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        tx.updated_at = Some(chrono::Utc::now());
        repo.update_transaction(&tx).await.unwrap();

        let fetched = repo.get_transaction(tx.id).await.unwrap().unwrap();
        assert_eq!(fetched.date, tx.date);
        assert!(fetched.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_transaction_not_found() {
        let (repo, category) = repo_with_category().await;
        let tx = expense(
            &category,
            "Ghost",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        );

        let result = repo.update_transaction(&tx).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let (repo, category) = repo_with_category().await;
        let tx = expense(
            &category,
            "Groceries",
            NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
        );
        repo.create_transaction(&tx).await.unwrap();

        repo.delete_transaction(tx.id).await.unwrap();

        assert_eq!(repo.get_transaction(tx.id).await.unwrap(), None);
        assert!(matches!(
            repo.delete_transaction(tx.id).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_categories_sorted_and_filtered_by_kind() {
        let repo = SqliteRepository::new_in_memory().await.unwrap();
        for (name, kind) in [
            ("Transport", TransactionType::Expense),
            ("Food", TransactionType::Expense),
            ("Salary", TransactionType::Income),
        ] {
            repo.create_category(&Category::new(test_user(), name, kind))
                .await
                .unwrap();
        }

        let all = repo.categories_for_user(test_user()).await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Food", "Salary", "Transport"]);

        let expenses = repo
            .categories_of_type(test_user(), TransactionType::Expense)
            .await
            .unwrap();
        assert_eq!(expenses.len(), 2);
    }

    #[tokio::test]
    async fn test_category_update_and_delete() {
        let (repo, category) = repo_with_category().await;

        let mut renamed = category.clone();
        renamed.name = "Dining".to_string();
        repo.update_category(&renamed).await.unwrap();

        let fetched = repo.get_category(category.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Dining");

        repo.delete_category(category.id).await.unwrap();
        assert_eq!(repo.get_category(category.id).await.unwrap(), None);
    }
}
