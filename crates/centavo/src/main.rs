use anyhow::Result;
use chrono::Local;
use clap::Parser;
use rust_decimal::Decimal;
use tokio_stream::StreamExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use centavo::config::Config;
use centavo::sync::Ledger;
use centavo::{mock_data, storage};

use centavo_core::ledger::{CreateTransactionRequest, TransactionType};
use centavo_core::storage::MonthKey;

/// Centavo - demo ledger session over a seeded store
#[derive(Parser, Debug)]
#[command(name = "centavo")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Month to summarize (YYYY-MM); defaults to the current month
    #[arg(long, short, env = "CENTAVO_MONTH")]
    month: Option<String>,

    /// User ID for the session; defaults to a fresh one
    #[arg(long, short, env = "CENTAVO_USER")]
    user: Option<Uuid>,
}

#[cfg(feature = "inmemory")]
async fn open_store(_config: &Config) -> Result<storage::InMemoryRepository> {
    Ok(storage::InMemoryRepository::new())
}

#[cfg(all(feature = "sqlite", not(feature = "inmemory")))]
async fn open_store(config: &Config) -> Result<storage::SqliteRepository> {
    Ok(storage::SqliteRepository::new(&config.sqlite_path).await?)
}

#[cfg(not(any(feature = "inmemory", feature = "sqlite")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite'. \
    Example: cargo build -p centavo --features inmemory"
);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "centavo=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    let month = match &cli.month {
        Some(raw) => MonthKey::parse(raw)?,
        None => MonthKey::of(Local::now().date_naive()),
    };
    let user_id = cli.user.unwrap_or_else(Uuid::new_v4);

    let store = std::sync::Arc::new(open_store(&config).await?);
    let ledger = Ledger::with_policy(store, user_id, config.cache_policy());
    let gc = ledger.cache().start_gc();

    // Log cache transitions as they happen.
    let mut events = ledger.cache().event_stream();
    let event_logger = tokio::spawn(async move {
        while let Some(Ok(event)) = events.next().await {
            tracing::debug!(?event, "cache event");
        }
    });

    seed_ledger(&ledger, month).await?;

    // Record one more expense through the normal mutation path.
    let food = ledger
        .categories_of(TransactionType::Expense)
        .await?
        .into_iter()
        .find(|category| category.name == "Food")
        .expect("seeded Food category");
    ledger
        .record_transaction(
            CreateTransactionRequest::new(
                TransactionType::Expense,
                "Groceries",
                Decimal::from(500),
                food.id,
                month.first_day() + chrono::Duration::days(14),
            )
            .with_description("demo entry"),
        )
        .await?;

    print_report(&ledger, month).await?;

    gc.abort();
    event_logger.abort();
    Ok(())
}

/// Seeds categories and a month of transactions for the session user.
async fn seed_ledger<R>(ledger: &Ledger<R>, month: MonthKey) -> Result<()>
where
    R: centavo_core::storage::LedgerStore + 'static,
{
    let mut category_ids = Vec::new();
    for request in mock_data::seed_categories() {
        let name = request.name.clone();
        let category = ledger.create_category(request).await?;
        category_ids.push((name, category.id));
    }

    for request in mock_data::seed_transactions(&category_ids, month.first_day()) {
        ledger.record_transaction(request).await?;
    }

    tracing::info!(user_id = %ledger.user_id(), month = %month, "Seeded demo ledger");
    Ok(())
}

/// Prints the dashboard, distribution, and table views for one month.
async fn print_report<R>(ledger: &Ledger<R>, month: MonthKey) -> Result<()>
where
    R: centavo_core::storage::LedgerStore + 'static,
{
    let totals = ledger.monthly_totals(month).await?;
    println!("== {month} ==");
    println!("income:   {:>12}", totals.income);
    println!("expenses: {:>12}", totals.expenses);
    println!("balance:  {:>12}", totals.balance());

    println!("\nExpense distribution:");
    for slice in ledger.monthly_expense_distribution(month).await? {
        println!("  {:<16} {:>10}", slice.name, slice.total);
    }

    println!("\nTransactions:");
    for row in ledger.transaction_table().await? {
        let tx = &row.transaction;
        println!(
            "  {}  {:<8} {:<20} {:<14} {:>10}",
            tx.date, tx.kind, tx.title, row.category_name, tx.amount
        );
    }

    Ok(())
}
