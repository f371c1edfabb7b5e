//! Seed data for the demo binary.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;

use centavo_core::ledger::{CreateCategoryRequest, CreateTransactionRequest, TransactionType};

/// Default expense categories for a fresh demo ledger.
pub fn seed_categories() -> Vec<CreateCategoryRequest> {
    vec![
        CreateCategoryRequest::new("Salary", TransactionType::Income),
        CreateCategoryRequest::new("Freelance", TransactionType::Income),
        CreateCategoryRequest::new("Food", TransactionType::Expense),
        CreateCategoryRequest::new("Transport", TransactionType::Expense),
        CreateCategoryRequest::new("Rent", TransactionType::Expense),
        CreateCategoryRequest::new("Entertainment", TransactionType::Expense),
    ]
}

/// Builds a month of plausible transactions against the seeded
/// categories. `category_ids` pairs each seed category name with its
/// created id.
pub fn seed_transactions(
    category_ids: &[(String, uuid::Uuid)],
    month_anchor: NaiveDate,
) -> Vec<CreateTransactionRequest> {
    let mut rng = rand::rng();
    let id_of = |name: &str| {
        category_ids
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, id)| *id)
            .expect("seed category exists")
    };
    let day = |d: u32| {
        NaiveDate::from_ymd_opt(month_anchor.year(), month_anchor.month(), d)
            .unwrap_or(month_anchor)
    };
    let mut amount = |base: i64, spread: i64| {
        Decimal::from(base + rng.random_range(0..=spread))
    };

    vec![
        CreateTransactionRequest::new(
            TransactionType::Income,
            "Monthly salary",
            amount(42_000, 0),
            id_of("Salary"),
            day(1),
        ),
        CreateTransactionRequest::new(
            TransactionType::Income,
            "Logo design gig",
            amount(3_000, 2_000),
            id_of("Freelance"),
            day(12),
        ),
        CreateTransactionRequest::new(
            TransactionType::Expense,
            "Apartment rent",
            amount(15_000, 0),
            id_of("Rent"),
            day(5),
        ),
        CreateTransactionRequest::new(
            TransactionType::Expense,
            "Weekly groceries",
            amount(2_500, 800),
            id_of("Food"),
            day(7),
        )
        .with_description("wet market and supermarket run"),
        CreateTransactionRequest::new(
            TransactionType::Expense,
            "Groceries",
            amount(2_500, 800),
            id_of("Food"),
            day(14),
        ),
        CreateTransactionRequest::new(
            TransactionType::Expense,
            "Commute card top-up",
            amount(1_000, 500),
            id_of("Transport"),
            day(3),
        ),
        CreateTransactionRequest::new(
            TransactionType::Expense,
            "Movie night",
            amount(600, 400),
            id_of("Entertainment"),
            day(20),
        ),
    ]
}
