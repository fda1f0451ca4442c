// Transaction entity - immutable, append-only ledger record.
// Once written a transaction is never modified or deleted; replaying an
// account's transactions in order must reproduce its stored balance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// TRANSACTION KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "DEPOSIT",
            TransactionKind::Withdrawal => "WITHDRAWAL",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionKind> {
        match s {
            "DEPOSIT" => Some(TransactionKind::Deposit),
            "WITHDRAWAL" => Some(TransactionKind::Withdrawal),
            _ => None,
        }
    }

    /// Sign applied to the amount when replaying the ledger.
    pub fn signum(&self) -> f64 {
        match self {
            TransactionKind::Deposit => 1.0,
            TransactionKind::Withdrawal => -1.0,
        }
    }
}

// ============================================================================
// TRANSACTION RECORD
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Store-assigned, monotonically increasing.
    pub transaction_id: i64,

    /// Owning account.
    pub account_number: String,

    pub kind: TransactionKind,

    /// Positive amount moved by this transaction.
    pub amount: f64,

    /// The account balance immediately after this transaction applied.
    pub balance_after: f64,

    pub description: String,

    pub transaction_date: DateTime<Utc>,
}
