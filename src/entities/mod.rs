// Domain records - typed replacements for the pipe-delimited summaries
// the legacy system shuttled between its database and session layers.

pub mod account;
pub mod customer;
pub mod transaction;

pub use account::{Account, AccountStatus, AccountSummary, AccountType};
pub use customer::{Customer, NewCustomer};
pub use transaction::{Transaction, TransactionKind};
