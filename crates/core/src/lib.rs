//! Core domain and contracts for the centavo personal-finance tracker.
//!
//! This crate is the functional core: domain types, validation, derived
//! views, query-key taxonomy, and the repository/cache contracts. It
//! performs no I/O; the engine crate provides the implementations.

pub mod cache;
pub mod ledger;
pub mod storage;
