//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types,
//! testable without database access. Dates are stored as `YYYY-MM-DD`
//! text, timestamps as RFC 3339 text, and amounts as decimal text.

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use rust_decimal::Decimal;
use uuid::Uuid;

use centavo_core::ledger::{Category, Transaction, TransactionType};

/// Convert a SQLite row to a Transaction.
///
/// Expected columns: id, user_id, kind, title, amount, category_id,
/// date, description, created_at, updated_at
pub fn row_to_transaction(row: &Row) -> rusqlite::Result<Transaction> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let title: String = row.get(3)?;
    let amount: String = row.get(4)?;
    let category_id: String = row.get(5)?;
    let date: String = row.get(6)?;
    let description: Option<String> = row.get(7)?;
    let created_at: String = row.get(8)?;
    let updated_at: Option<String> = row.get(9)?;

    Ok(Transaction {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        kind: parse_kind(&kind)?,
        title,
        amount: parse_amount(&amount)?,
        category_id: parse_uuid(&category_id)?,
        date: parse_date(&date)?,
        description,
        created_at: parse_datetime(&created_at)?,
        updated_at: updated_at.as_deref().map(parse_datetime).transpose()?,
    })
}

/// Convert a SQLite row to a Category.
///
/// Expected columns: id, user_id, name, kind, created_at
pub fn row_to_category(row: &Row) -> rusqlite::Result<Category> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let name: String = row.get(2)?;
    let kind: String = row.get(3)?;
    let created_at: String = row.get(4)?;

    Ok(Category {
        id: parse_uuid(&id)?,
        user_id: parse_uuid(&user_id)?,
        name,
        kind: parse_kind(&kind)?,
        created_at: parse_datetime(&created_at)?,
    })
}

/// Format a date for storage.
pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Format a timestamp for storage.
pub fn format_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.to_rfc3339()
}

/// Format an amount for storage.
pub fn format_amount(amount: &Decimal) -> String {
    amount.to_string()
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| invalid_text(format!("invalid UUID '{s}': {e}")))
}

fn parse_kind(s: &str) -> rusqlite::Result<TransactionType> {
    TransactionType::parse(s)
        .ok_or_else(|| invalid_text(format!("invalid transaction type '{s}'")))
}

fn parse_amount(s: &str) -> rusqlite::Result<Decimal> {
    s.parse()
        .map_err(|e| invalid_text(format!("invalid amount '{s}': {e}")))
}

fn parse_date(s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| invalid_text(format!("invalid date '{s}': {e}")))
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| invalid_text(format!("invalid timestamp '{s}': {e}")))
}

fn invalid_text(message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 5).unwrap();
        assert_eq!(format_date(&date), "2024-07-05");
    }

    #[test]
    fn test_date_roundtrip() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
        assert_eq!(parse_date(&format_date(&date)).unwrap(), date);
    }

    #[test]
    fn test_datetime_roundtrip() {
        let datetime = Utc.with_ymd_and_hms(2024, 7, 15, 10, 30, 0).unwrap();
        assert_eq!(parse_datetime(&format_datetime(&datetime)).unwrap(), datetime);
    }

    #[test]
    fn test_amount_roundtrip() {
        let amount: Decimal = "1234.56".parse().unwrap();
        assert_eq!(format_amount(&amount), "1234.56");
        assert_eq!(parse_amount("1234.56").unwrap(), amount);
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("income").unwrap(), TransactionType::Income);
        assert_eq!(parse_kind("expense").unwrap(), TransactionType::Expense);
        assert!(parse_kind("transfer").is_err());
    }

    #[test]
    fn test_parse_invalid_date_fails() {
        assert!(parse_date("15/07/2024").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_parse_invalid_uuid_fails() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }
}
