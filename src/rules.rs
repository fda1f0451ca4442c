// Ledger rules engine - pure decisions, no I/O.
// Every function returns a plain value; turning a refusal into a message is
// the caller's job, and a refused check leaves no trace anywhere.

use crate::entities::{Account, TransactionKind};

// ============================================================================
// LIMITS
// ============================================================================

pub const MINIMUM_BALANCE: f64 = 0.0;
pub const MAXIMUM_BALANCE: f64 = 1_000_000.0;

/// Per-operation withdrawal ceiling.
pub const MAX_WITHDRAWAL_AMOUNT: f64 = 10_000.0;

/// Aggregate ceiling on one account's withdrawals within a UTC day.
pub const MAX_DAILY_WITHDRAWAL: f64 = 50_000.0;

/// System-wide floor on deposits and withdrawals alike, checked before the
/// per-operation predicates.
pub const MIN_TRANSACTION_AMOUNT: f64 = 1.0;

// ============================================================================
// PREDICATES
// ============================================================================

/// Positivity only. Per-operation ceilings are separate checks.
pub fn is_valid_amount(amount: f64) -> bool {
    amount > 0.0
}

/// The system-wide minimum, applied uniformly to deposits and withdrawals.
pub fn meets_minimum(amount: f64) -> bool {
    amount >= MIN_TRANSACTION_AMOUNT
}

/// Active account, positive amount, covered by the balance, and within the
/// per-operation ceiling. The daily aggregate ceiling is enforced by the
/// ledger against the transaction history, not here.
pub fn can_withdraw(account: &Account, amount: f64) -> bool {
    account.is_active()
        && is_valid_amount(amount)
        && account.has_sufficient_funds(amount)
        && amount <= MAX_WITHDRAWAL_AMOUNT
}

/// Active account, positive amount, and the resulting balance stays within
/// the maximum.
pub fn can_deposit(account: &Account, amount: f64) -> bool {
    account.is_active() && is_valid_amount(amount) && account.balance + amount <= MAXIMUM_BALANCE
}

/// Balance arithmetic for a permitted operation. Only ever invoked after
/// the matching `can_*` predicate passed.
pub fn new_balance(current: f64, amount: f64, kind: TransactionKind) -> f64 {
    match kind {
        TransactionKind::Deposit => current + amount,
        TransactionKind::Withdrawal => current - amount,
    }
}

/// Structural validity: non-empty account number, positive owner id.
/// The account type is a closed enum, so it needs no separate check.
pub fn is_valid_account(account: &Account) -> bool {
    !account.account_number.is_empty() && account.customer_id > 0
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AccountStatus, AccountType};
    use chrono::Utc;

    fn account(balance: f64, status: AccountStatus) -> Account {
        Account {
            account_number: "555000111".to_string(),
            customer_id: 7,
            account_type: AccountType::Checkings,
            balance,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_valid_amount() {
        assert!(is_valid_amount(0.01));
        assert!(is_valid_amount(10_000.0));
        assert!(!is_valid_amount(0.0));
        assert!(!is_valid_amount(-1.0));
    }

    #[test]
    fn test_meets_minimum() {
        assert!(meets_minimum(1.0));
        assert!(meets_minimum(1.01));
        assert!(!meets_minimum(0.99));
        assert!(!meets_minimum(0.0));
    }

    #[test]
    fn test_can_withdraw_balance_bounds() {
        let acct = account(100.0, AccountStatus::Active);
        assert!(!can_withdraw(&acct, 150.0));
        assert!(can_withdraw(&acct, 100.0));
        assert!(can_withdraw(&acct, 50.0));
        assert!(!can_withdraw(&acct, 0.0));
        assert!(!can_withdraw(&acct, -10.0));
    }

    #[test]
    fn test_can_withdraw_requires_active_status() {
        assert!(!can_withdraw(&account(100.0, AccountStatus::Frozen), 50.0));
        assert!(!can_withdraw(&account(100.0, AccountStatus::Inactive), 50.0));
        assert!(!can_withdraw(&account(100.0, AccountStatus::Closed), 50.0));
    }

    #[test]
    fn test_can_withdraw_per_operation_ceiling() {
        let rich = account(100_000.0, AccountStatus::Active);
        assert!(can_withdraw(&rich, MAX_WITHDRAWAL_AMOUNT));
        assert!(!can_withdraw(&rich, MAX_WITHDRAWAL_AMOUNT + 0.01));
    }

    #[test]
    fn test_can_deposit_balance_cap() {
        let near_cap = account(999_900.0, AccountStatus::Active);
        assert!(!can_deposit(&near_cap, 200.0));
        assert!(can_deposit(&near_cap, 100.0));
    }

    #[test]
    fn test_can_deposit_requires_active_and_positive() {
        assert!(!can_deposit(&account(0.0, AccountStatus::Frozen), 100.0));
        assert!(!can_deposit(&account(0.0, AccountStatus::Active), 0.0));
        assert!(!can_deposit(&account(0.0, AccountStatus::Active), -100.0));
    }

    #[test]
    fn test_new_balance() {
        assert_eq!(new_balance(100.0, 25.0, TransactionKind::Deposit), 125.0);
        assert_eq!(new_balance(100.0, 25.0, TransactionKind::Withdrawal), 75.0);
    }

    #[test]
    fn test_is_valid_account() {
        let good = account(0.0, AccountStatus::Active);
        assert!(is_valid_account(&good));

        let mut no_number = good.clone();
        no_number.account_number = String::new();
        assert!(!is_valid_account(&no_number));

        let mut bad_owner = good;
        bad_owner.customer_id = 0;
        assert!(!is_valid_account(&bad_owner));
    }
}
