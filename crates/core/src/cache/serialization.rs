//! Pure functions for moving domain values in and out of cache bytes.
//!
//! Cached values are stored as JSON so they stay human-readable when
//! debugging a dumped cache.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::error::{CacheError, Result};

/// Serializes a value to JSON bytes for cache storage.
pub fn to_cache_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| CacheError::Serialization(e.to_string()))
}

/// Deserializes JSON cache bytes back into a value.
pub fn from_cache_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| CacheError::Serialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{Category, TransactionType};
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn fixed_timestamp() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_roundtrip_category_list() {
        let user_id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let categories = vec![
            Category::new(user_id, "Food", TransactionType::Expense)
                .with_created_at(fixed_timestamp()),
            Category::new(user_id, "Salary", TransactionType::Income)
                .with_created_at(fixed_timestamp()),
        ];

        let bytes = to_cache_bytes(&categories).expect("serialize should succeed");
        let back: Vec<Category> = from_cache_bytes(&bytes).expect("deserialize should succeed");

        assert_eq!(categories, back);
    }

    #[test]
    fn test_empty_list_roundtrip() {
        let bytes = to_cache_bytes(&Vec::<Category>::new()).unwrap();
        assert_eq!(bytes, b"[]");
        let back: Vec<Category> = from_cache_bytes(&bytes).unwrap();
        assert!(back.is_empty());
    }

    #[test]
    fn test_malformed_bytes_error() {
        let result: Result<Vec<Category>> = from_cache_bytes(b"not valid json");
        assert!(matches!(result, Err(CacheError::Serialization(_))));
    }
}
