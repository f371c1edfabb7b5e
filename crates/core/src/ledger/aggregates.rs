//! Pure fold/group/sort helpers over transaction lists.
//!
//! Everything here is recomputed from fetched data on demand; nothing
//! is persisted and inputs are never mutated.

use std::collections::HashMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{Category, Transaction, TransactionType};

/// Name used for expense slices whose category no longer resolves.
const UNCATEGORIZED: &str = "Uncategorized";

/// Name of the synthetic remainder slice in the expense distribution.
const BALANCE: &str = "Balance";

/// Income/expense totals over some transaction window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    pub income: Decimal,
    pub expenses: Decimal,
}

impl LedgerTotals {
    /// Balance is income minus expenses; negative when overspent.
    pub fn balance(&self) -> Decimal {
        self.income - self.expenses
    }
}

/// Sums a transaction list into income/expense totals.
pub fn summarize(transactions: &[Transaction]) -> LedgerTotals {
    let mut totals = LedgerTotals::default();
    for tx in transactions {
        match tx.kind {
            TransactionType::Income => totals.income += tx.amount,
            TransactionType::Expense => totals.expenses += tx.amount,
        }
    }
    totals
}

/// One slice of the category-wise expense distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySlice {
    pub name: String,
    pub total: Decimal,
}

/// Buckets expenses by category name, largest first.
///
/// Transactions whose category is missing from `categories` fall into an
/// `Uncategorized` slice. When the window has income left over after
/// expenses, a trailing `Balance` slice is appended so the distribution
/// accounts for the full income.
pub fn expense_distribution(
    transactions: &[Transaction],
    categories: &[Category],
) -> Vec<CategorySlice> {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let mut buckets: HashMap<&str, Decimal> = HashMap::new();
    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        let name = names.get(&tx.category_id).copied().unwrap_or(UNCATEGORIZED);
        *buckets.entry(name).or_default() += tx.amount;
    }

    let mut slices: Vec<CategorySlice> = buckets
        .into_iter()
        .map(|(name, total)| CategorySlice {
            name: name.to_string(),
            total,
        })
        .collect();
    // Largest slice first; name as a tie-breaker keeps output stable.
    slices.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));

    let totals = summarize(transactions);
    if totals.balance() > Decimal::ZERO && totals.income > Decimal::ZERO {
        slices.push(CategorySlice {
            name: BALANCE.to_string(),
            total: totals.balance(),
        });
    }

    slices
}

/// A transaction joined with its denormalized category name, ready for
/// table display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub transaction: Transaction,
    pub category_name: String,
}

/// Joins transactions with category names and sorts newest-date first.
pub fn table_rows(transactions: &[Transaction], categories: &[Category]) -> Vec<TransactionRow> {
    let names: HashMap<Uuid, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_str()))
        .collect();

    let mut rows: Vec<TransactionRow> = transactions
        .iter()
        .map(|tx| TransactionRow {
            transaction: tx.clone(),
            category_name: names
                .get(&tx.category_id)
                .copied()
                .unwrap_or(UNCATEGORIZED)
                .to_string(),
        })
        .collect();
    rows.sort_by(|a, b| b.transaction.date.cmp(&a.transaction.date));
    rows
}
