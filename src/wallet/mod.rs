//! Wallet module
//!
//! Persistence layer for per-(user, currency) balance rows.

mod error;
mod store;

pub use error::WalletStoreError;
pub use store::{Wallet, WalletStore};
