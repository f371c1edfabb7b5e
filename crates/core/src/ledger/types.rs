use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether money flows in or out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Returns the lowercase wire/storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    /// Parses the lowercase storage representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A user-defined bucket that transactions are recorded against.
///
/// Category names are unique per user and type by convention; the store
/// does not enforce this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TransactionType,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a new category owned by `user_id`.
    pub fn new(user_id: Uuid, name: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: name.into(),
            kind,
            created_at: Utc::now(),
        }
    }

    /// Sets a specific ID for this category (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets a specific creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }
}

/// A single income or expense record.
///
/// The `date` is a plain calendar date; storing it without a time
/// component keeps month grouping stable across timezones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionType,
    pub title: String,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Creates a new transaction owned by `user_id`.
    pub fn new(
        user_id: Uuid,
        kind: TransactionType,
        title: impl Into<String>,
        amount: Decimal,
        category_id: Uuid,
        date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            title: title.into(),
            amount,
            category_id,
            date,
            description: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Sets a specific ID for this transaction (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets a specific creation timestamp (useful for testing).
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    /// Sets the last-modified timestamp.
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Returns true if this is an income transaction.
    pub fn is_income(&self) -> bool {
        self.kind == TransactionType::Income
    }

    /// Returns true if this is an expense transaction.
    pub fn is_expense(&self) -> bool {
        self.kind == TransactionType::Expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn test_user() -> Uuid {
        Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap()
    }

    fn fixed_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_transaction_type_roundtrip() {
        assert_eq!(TransactionType::parse("income"), Some(TransactionType::Income));
        assert_eq!(TransactionType::parse("expense"), Some(TransactionType::Expense));
        assert_eq!(TransactionType::parse("transfer"), None);
        assert_eq!(TransactionType::Income.as_str(), "income");
        assert_eq!(TransactionType::Expense.to_string(), "expense");
    }

    #[test]
    fn test_transaction_type_serde_lowercase() {
        let json = serde_json::to_string(&TransactionType::Expense).unwrap();
        assert_eq!(json, "\"expense\"");
        let parsed: TransactionType = serde_json::from_str("\"income\"").unwrap();
        assert_eq!(parsed, TransactionType::Income);
    }

    #[test]
    fn test_transaction_builder() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let category_id = Uuid::new_v4();
        let tx = Transaction::new(
            test_user(),
            TransactionType::Expense,
            "Groceries",
            dec("500.00"),
            category_id,
            date,
        )
        .with_description("weekly shop")
        .with_created_at(fixed_timestamp());

        assert_eq!(tx.user_id, test_user());
        assert_eq!(tx.title, "Groceries");
        assert_eq!(tx.amount, dec("500.00"));
        assert_eq!(tx.date, date);
        assert_eq!(tx.description.as_deref(), Some("weekly shop"));
        assert!(tx.updated_at.is_none());
        assert!(tx.is_expense());
        assert!(!tx.is_income());
    }

    #[test]
    fn test_transaction_date_serializes_as_plain_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let tx = Transaction::new(
            test_user(),
            TransactionType::Income,
            "Salary",
            dec("1200"),
            Uuid::new_v4(),
            date,
        )
        .with_created_at(fixed_timestamp());

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["date"], "2024-07-15");
    }

    #[test]
    fn test_category_builder() {
        let category = Category::new(test_user(), "Food", TransactionType::Expense)
            .with_created_at(fixed_timestamp());

        assert_eq!(category.name, "Food");
        assert_eq!(category.kind, TransactionType::Expense);
        assert_eq!(category.created_at, fixed_timestamp());
    }

    #[test]
    fn test_transaction_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        let tx = Transaction::new(
            test_user(),
            TransactionType::Expense,
            "Groceries",
            dec("500.00"),
            Uuid::new_v4(),
            date,
        )
        .with_created_at(fixed_timestamp())
        .with_updated_at(fixed_timestamp());

        let json = serde_json::to_vec(&tx).unwrap();
        let back: Transaction = serde_json::from_slice(&json).unwrap();
        assert_eq!(tx, back);
    }
}
