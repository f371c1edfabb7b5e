//! Invalidation rules.
//!
//! Given the minimal facts about a completed mutation, compute the
//! exhaustive set of query keys to mark stale. The set is deliberately
//! conservative: the unscoped transaction list and the current
//! wall-clock month are always included, so the dashboard reflects
//! backdated edits and survives clock-skew between devices. Do not trim
//! these overlaps.

use chrono::NaiveDate;
use uuid::Uuid;

use centavo_core::cache::QueryKey;
use centavo_core::ledger::TransactionType;
use centavo_core::storage::MonthKey;

/// The facts about a mutation that invalidation depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerMutation {
    /// A transaction was created, updated, or deleted.
    Transaction {
        user_id: Uuid,
        /// The month the transaction lands in after the mutation (for
        /// deletes, the month it was in).
        month: MonthKey,
        /// For updates that moved the transaction across months, the
        /// month it was in before.
        previous_month: Option<MonthKey>,
    },
    /// A category was created, updated, or deleted.
    Category {
        user_id: Uuid,
        kind: TransactionType,
    },
}

impl LedgerMutation {
    /// A transaction created or deleted in `month`.
    pub fn transaction(user_id: Uuid, month: MonthKey) -> Self {
        Self::Transaction {
            user_id,
            month,
            previous_month: None,
        }
    }

    /// A transaction updated, possibly moved from `previous_month`.
    pub fn transaction_update(user_id: Uuid, month: MonthKey, previous_month: MonthKey) -> Self {
        Self::Transaction {
            user_id,
            month,
            previous_month: Some(previous_month),
        }
    }

    /// Any mutation of a category of the given type.
    pub fn category(user_id: Uuid, kind: TransactionType) -> Self {
        Self::Category { user_id, kind }
    }
}

/// Computes the query keys a mutation makes stale.
///
/// `today` supplies the wall-clock month for the always-invalidated
/// dashboard key; callers pass the current date, tests pin it.
pub fn invalidation_targets(mutation: &LedgerMutation, today: NaiveDate) -> Vec<QueryKey> {
    let mut targets = Vec::new();
    let mut push = |key: QueryKey| {
        if !targets.contains(&key) {
            targets.push(key);
        }
    };

    match mutation {
        LedgerMutation::Transaction {
            user_id,
            month,
            previous_month,
        } => {
            // The all-time list changed.
            push(QueryKey::transactions(*user_id));
            // The affected month view changed.
            push(QueryKey::monthly_transactions(*user_id, *month));
            // A cross-month move dirties the month it left too.
            if let Some(previous) = previous_month {
                push(QueryKey::monthly_transactions(*user_id, *previous));
            }
            // The dashboard always shows the current month.
            push(QueryKey::monthly_transactions(*user_id, MonthKey::of(today)));
            // Category views surface per-category usage indirectly.
            push(QueryKey::categories(*user_id));
        }
        LedgerMutation::Category { user_id, kind } => {
            push(QueryKey::categories(*user_id));
            push(QueryKey::categories_of(*user_id, *kind));
            // Transaction tables display denormalized category names.
            push(QueryKey::transactions(*user_id));
        }
    }

    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> Uuid {
        Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap()
    }

    fn month(year: i32, month_number: u32) -> MonthKey {
        MonthKey::new(year, month_number).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 10).unwrap()
    }

    #[test]
    fn test_transaction_create_targets() {
        let mutation = LedgerMutation::transaction(test_user(), month(2024, 7));
        let targets = invalidation_targets(&mutation, today());

        assert_eq!(
            targets,
            vec![
                QueryKey::transactions(test_user()),
                QueryKey::monthly_transactions(test_user(), month(2024, 7)),
                QueryKey::monthly_transactions(test_user(), month(2024, 9)),
                QueryKey::categories(test_user()),
            ]
        );
    }

    #[test]
    fn test_backdated_transaction_still_dirties_current_month() {
        // A backdated entry changes the all-time totals shown on the
        // dashboard even though its own month is long past.
        let mutation = LedgerMutation::transaction(test_user(), month(2023, 1));
        let targets = invalidation_targets(&mutation, today());

        assert!(targets
            .contains(&QueryKey::monthly_transactions(test_user(), month(2024, 9))));
    }

    #[test]
    fn test_transaction_in_current_month_deduplicates() {
        let mutation = LedgerMutation::transaction(test_user(), month(2024, 9));
        let targets = invalidation_targets(&mutation, today());

        let current = QueryKey::monthly_transactions(test_user(), month(2024, 9));
        assert_eq!(targets.iter().filter(|key| **key == current).count(), 1);
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn test_cross_month_update_dirties_both_months() {
        let mutation =
            LedgerMutation::transaction_update(test_user(), month(2024, 8), month(2024, 7));
        let targets = invalidation_targets(&mutation, today());

        assert!(targets.contains(&QueryKey::monthly_transactions(test_user(), month(2024, 7))));
        assert!(targets.contains(&QueryKey::monthly_transactions(test_user(), month(2024, 8))));
    }

    #[test]
    fn test_same_month_update_lists_month_once() {
        let mutation =
            LedgerMutation::transaction_update(test_user(), month(2024, 7), month(2024, 7));
        let targets = invalidation_targets(&mutation, today());

        let july = QueryKey::monthly_transactions(test_user(), month(2024, 7));
        assert_eq!(targets.iter().filter(|key| **key == july).count(), 1);
    }

    #[test]
    fn test_category_mutation_targets() {
        let mutation = LedgerMutation::category(test_user(), TransactionType::Expense);
        let targets = invalidation_targets(&mutation, today());

        assert_eq!(
            targets,
            vec![
                QueryKey::categories(test_user()),
                QueryKey::categories_of(test_user(), TransactionType::Expense),
                QueryKey::transactions(test_user()),
            ]
        );
    }
}
