//! Mutation request payloads.
//!
//! Pure data types describing what a caller wants changed; the sync
//! layer validates them and turns them into store writes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{Category, Transaction, TransactionType};

/// Request payload for recording a new transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub kind: TransactionType,
    pub title: String,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreateTransactionRequest {
    pub fn new(
        kind: TransactionType,
        title: impl Into<String>,
        amount: Decimal,
        category_id: Uuid,
        date: NaiveDate,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            amount,
            category_id,
            date,
            description: None,
        }
    }

    /// Set the free-text description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Convert into a transaction owned by `user_id`.
    pub fn into_transaction(self, user_id: Uuid) -> Transaction {
        let mut transaction = Transaction::new(
            user_id,
            self.kind,
            self.title,
            self.amount,
            self.category_id,
            self.date,
        );
        if let Some(description) = self.description {
            transaction = transaction.with_description(description);
        }
        transaction
    }
}

/// Request payload for updating a transaction. Unset fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTransactionRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Apply this request on top of an existing transaction.
    pub fn apply_to(self, mut transaction: Transaction) -> Transaction {
        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(title) = self.title {
            transaction.title = title;
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(category_id) = self.category_id {
            transaction.category_id = category_id;
        }
        if let Some(date) = self.date {
            transaction.date = date;
        }
        if let Some(description) = self.description {
            transaction.description = Some(description);
        }
        transaction
    }
}

/// Request payload for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub kind: TransactionType,
}

impl CreateCategoryRequest {
    pub fn new(name: impl Into<String>, kind: TransactionType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Convert into a category owned by `user_id`.
    pub fn into_category(self, user_id: Uuid) -> Category {
        Category::new(user_id, self.name, self.kind)
    }
}

/// Request payload for updating a category. Unset fields are left
/// unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<TransactionType>,
}

impl UpdateCategoryRequest {
    /// Create an empty update request.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Apply this request on top of an existing category.
    pub fn apply_to(self, mut category: Category) -> Category {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(kind) = self.kind {
            category.kind = kind;
        }
        category
    }
}
