//! Mutation-to-invalidation wiring and the per-user ledger session.

mod error;
mod invalidation;
mod ledger;

pub use error::{LedgerError, Result};
pub use invalidation::{invalidation_targets, LedgerMutation};
pub use ledger::Ledger;
