//! Ledger module
//!
//! The append-only transaction log and statement rendering.

mod entries;
mod log;
pub mod statement;

pub use entries::{Direction, EntryStatus, LedgerEntry, NewEntry};
pub use log::{LedgerLogError, TransactionLog};
pub use statement::StatementFormat;
