// Account entity - owned by exactly one customer, carries the stored
// balance that the transaction ledger must reconcile to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

/// Closed set of account classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checkings,
    Current,
    Business,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checkings => "Checkings",
            AccountType::Current => "Current",
            AccountType::Business => "Business",
        }
    }

    /// Membership test against the closed set. Unknown labels are rejected,
    /// not coerced.
    pub fn parse(s: &str) -> Option<AccountType> {
        match s {
            "Savings" => Some(AccountType::Savings),
            "Checkings" => Some(AccountType::Checkings),
            "Current" => Some(AccountType::Current),
            "Business" => Some(AccountType::Business),
            _ => None,
        }
    }
}

// ============================================================================
// ACCOUNT STATUS
// ============================================================================

/// Lifecycle state. Accounts are created Active; transitions beyond being
/// representable are administrative concerns outside this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountStatus {
    Active,
    Inactive,
    Frozen,
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "ACTIVE",
            AccountStatus::Inactive => "INACTIVE",
            AccountStatus::Frozen => "FROZEN",
            AccountStatus::Closed => "CLOSED",
        }
    }

    pub fn parse(s: &str) -> Option<AccountStatus> {
        match s {
            "ACTIVE" => Some(AccountStatus::Active),
            "INACTIVE" => Some(AccountStatus::Inactive),
            "FROZEN" => Some(AccountStatus::Frozen),
            "CLOSED" => Some(AccountStatus::Closed),
            _ => None,
        }
    }
}

// ============================================================================
// ACCOUNT ENTITY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Globally unique 9-digit numeric string, immutable once assigned.
    pub account_number: String,

    /// Owning customer (positive, assigned by the store).
    pub customer_id: i64,

    pub account_type: AccountType,

    /// Current stored balance, bounded to [0, 1_000_000].
    pub balance: f64,

    pub status: AccountStatus,

    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn has_sufficient_funds(&self, amount: f64) -> bool {
        amount > 0.0 && self.balance >= amount
    }

    /// One-line summary for the session layer to render.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            account_number: self.account_number.clone(),
            account_type: self.account_type,
            balance: self.balance,
            low_balance: self.balance < AccountSummary::LOW_BALANCE_THRESHOLD,
        }
    }
}

// ============================================================================
// ACCOUNT SUMMARY
// ============================================================================

/// Typed listing row for a customer's active accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    pub account_number: String,
    pub account_type: AccountType,
    pub balance: f64,
    /// Set when the balance is below the alert threshold.
    pub low_balance: bool,
}

impl AccountSummary {
    pub const LOW_BALANCE_THRESHOLD: f64 = 100.0;
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_account(balance: f64, status: AccountStatus) -> Account {
        Account {
            account_number: "123456789".to_string(),
            customer_id: 1,
            account_type: AccountType::Savings,
            balance,
            status,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_account_type_round_trip() {
        for ty in [
            AccountType::Savings,
            AccountType::Checkings,
            AccountType::Current,
            AccountType::Business,
        ] {
            assert_eq!(AccountType::parse(ty.as_str()), Some(ty));
        }
        assert_eq!(AccountType::parse("Crypto"), None);
        assert_eq!(AccountType::parse("savings"), None);
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Frozen,
            AccountStatus::Closed,
        ] {
            assert_eq!(AccountStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AccountStatus::parse("SUSPENDED"), None);
    }

    #[test]
    fn test_sufficient_funds() {
        let account = test_account(100.0, AccountStatus::Active);
        assert!(account.has_sufficient_funds(100.0));
        assert!(account.has_sufficient_funds(50.0));
        assert!(!account.has_sufficient_funds(100.01));
        assert!(!account.has_sufficient_funds(0.0));
        assert!(!account.has_sufficient_funds(-5.0));
    }

    #[test]
    fn test_summary_low_balance_flag() {
        let low = test_account(99.99, AccountStatus::Active);
        assert!(low.summary().low_balance);

        let ok = test_account(100.0, AccountStatus::Active);
        assert!(!ok.summary().low_balance);
    }
}
