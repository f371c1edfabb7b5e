//! Storage backend implementations.
//!
//! Concrete implementations of the repository traits defined in
//! `centavo_core::storage`, selected via feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMap-backed store for tests and the demo
//!   binary
//! - `sqlite`: persistent backend using `rusqlite` and `tokio-rusqlite`

#[cfg(feature = "inmemory")]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRepository;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRepository;
