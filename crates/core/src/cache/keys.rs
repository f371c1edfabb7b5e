//! Structured query keys.
//!
//! Every distinct server read gets a structurally composable key so
//! invalidation can target exactly the reads it affects. Matching is
//! prefix-based: invalidating a coarse key covers all finer-grained
//! variants of the same entity kind and user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ledger::TransactionType;
use crate::storage::MonthKey;

/// The entity family a query reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Transactions,
    Categories,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Transactions => "transactions",
            EntityKind::Categories => "categories",
        }
    }
}

/// A structured identifier for one distinct server read.
///
/// A key is an entity kind, the owning user, and an ordered scope list
/// (empty for unscoped reads). Keys compare structurally, never through
/// their rendered string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    kind: EntityKind,
    user_id: Uuid,
    scope: Vec<String>,
}

impl QueryKey {
    /// Key for the full unscoped list of a user's transactions.
    pub fn transactions(user_id: Uuid) -> Self {
        Self {
            kind: EntityKind::Transactions,
            user_id,
            scope: Vec::new(),
        }
    }

    /// Key for a user's transactions restricted to one calendar month.
    pub fn monthly_transactions(user_id: Uuid, month: MonthKey) -> Self {
        Self {
            kind: EntityKind::Transactions,
            user_id,
            scope: vec![month.to_string()],
        }
    }

    /// Key for the full unscoped list of a user's categories.
    pub fn categories(user_id: Uuid) -> Self {
        Self {
            kind: EntityKind::Categories,
            user_id,
            scope: Vec::new(),
        }
    }

    /// Key for a user's categories restricted to income or expense.
    pub fn categories_of(user_id: Uuid, kind: TransactionType) -> Self {
        Self {
            kind: EntityKind::Categories,
            user_id,
            scope: vec![kind.as_str().to_string()],
        }
    }

    pub fn entity_kind(&self) -> EntityKind {
        self.kind
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    /// Prefix-match test used for invalidation.
    ///
    /// `a.is_prefix_of(b)` holds when both keys read the same entity
    /// kind for the same user and `a`'s scope list is a (possibly
    /// equal) prefix of `b`'s. A key is always a prefix of itself.
    pub fn is_prefix_of(&self, other: &QueryKey) -> bool {
        self.kind == other.kind
            && self.user_id == other.user_id
            && other.scope.starts_with(&self.scope)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.user_id)?;
        for part in &self.scope {
            write!(f, ":{part}")?;
        }
        Ok(())
    }
}
