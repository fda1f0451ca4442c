// Failure taxonomy. Every outcome is an explicit value: validation
// rejections are recoverable and re-promptable, integrity violations are
// recoverable with different input, storage failures surface the
// underlying SQLite error.

use thiserror::Error;

use crate::entities::TransactionKind;

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Why the rules engine refused a mutation. Carried inside
/// [`LedgerError::Rejected`] so callers can render a precise message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Amount below the system-wide minimum transaction amount.
    BelowMinimum,
    /// Amount above the per-operation withdrawal ceiling.
    ExceedsWithdrawalLimit,
    /// Withdrawal larger than the current balance.
    InsufficientFunds,
    /// Deposit would push the balance past the maximum.
    ExceedsBalanceCap,
    /// Account is not in Active status.
    AccountNotActive,
    /// Same-day withdrawals would exceed the daily aggregate ceiling.
    DailyLimitExceeded,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::BelowMinimum => "amount below minimum transaction amount",
            RejectReason::ExceedsWithdrawalLimit => "amount exceeds withdrawal limit",
            RejectReason::InsufficientFunds => "insufficient funds",
            RejectReason::ExceedsBalanceCap => "deposit would exceed maximum balance",
            RejectReason::AccountNotActive => "account is not active",
            RejectReason::DailyLimitExceeded => "daily withdrawal limit exceeded",
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    // ------------------------------------------------------------------
    // Validation failures (recoverable, re-promptable)
    // ------------------------------------------------------------------
    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: &'static str,
    },

    #[error("{kind:?} of {amount} rejected: {}", .reason.as_str())]
    Rejected {
        kind: TransactionKind,
        amount: f64,
        reason: RejectReason,
    },

    // ------------------------------------------------------------------
    // Integrity failures (recoverable with different input)
    // ------------------------------------------------------------------
    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("account number already exists: {0}")]
    DuplicateAccountNumber(String),

    #[error("account not found: {0}")]
    AccountNotFound(String),

    #[error("customer not found: {0}")]
    CustomerNotFound(i64),

    #[error("invalid credentials")]
    InvalidCredentials,

    /// A stored row failed to decode into its domain type. Indicates the
    /// database was written by something other than this store.
    #[error("corrupt row in {table}: {detail}")]
    CorruptRow { table: &'static str, detail: String },

    // ------------------------------------------------------------------
    // Storage failures
    // ------------------------------------------------------------------
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
