//! Cache-consistent data sync for a personal finance tracker.
//!
//! The pieces, leaf to root: storage backends implement the repository
//! traits from [`centavo_core`]; the [`cache`] module keeps query
//! results fresh with stale-while-revalidate semantics; the [`sync`]
//! module maps mutations to the exact set of cache keys they dirty and
//! exposes the per-user [`sync::Ledger`] session.

pub mod cache;
pub mod config;
pub mod mock_data;
pub mod storage;
pub mod sync;

pub use config::Config;
