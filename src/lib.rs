// Bastion Ledger - retail banking ledger core.
// Exposes the rules engine, the account store, and the operations the
// session layer drives; the interactive surface itself lives elsewhere.

pub mod auth;
pub mod db;
pub mod entities;
pub mod error;
pub mod ledger;
pub mod rules;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use db::AccountStore;
pub use entities::{
    Account, AccountStatus, AccountSummary, AccountType, Customer, NewCustomer, Transaction,
    TransactionKind,
};
pub use error::{LedgerError, RejectReason, Result};
pub use ledger::Ledger;
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
