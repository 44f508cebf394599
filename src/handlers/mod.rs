//! Ledger engine module
//!
//! One handler per money-movement operation. Each handler owns the
//! atomic unit for its operation: it opens the transaction scope, runs
//! the wallet mutations and log writes inside it, and commits. Any
//! error on the way rolls the whole unit back.

mod commands;
mod convert_handler;
mod fund_handler;
mod query_handler;
mod send_handler;
mod withdraw_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use convert_handler::ConvertHandler;
pub use fund_handler::FundHandler;
pub use query_handler::{FinancialSummary, StatementHandler, StatementQuery, SummaryHandler};
pub use send_handler::SendHandler;
pub use withdraw_handler::WithdrawHandler;
