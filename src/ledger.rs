// Ledger orchestration - glues the pure rules to the store. Each operation
// fetches current state, runs the rules, and applies the permitted mutation
// atomically. A refused operation returns before any write happens.

use tracing::info;

use crate::auth;
use crate::db::AccountStore;
use crate::entities::{AccountType, NewCustomer, Transaction, TransactionKind};
use crate::error::{LedgerError, RejectReason, Result};
use crate::rules;
use crate::session::Session;
use crate::validation;

pub struct Ledger<'a> {
    store: &'a mut AccountStore,
}

impl<'a> Ledger<'a> {
    pub fn new(store: &'a mut AccountStore) -> Self {
        Ledger { store }
    }

    // ========================================================================
    // REGISTRATION / LOGIN
    // ========================================================================

    /// Validate registration input, hash the PIN, and insert the customer.
    pub fn register_customer(&mut self, customer: &NewCustomer) -> Result<i64> {
        if customer.first_name.trim().is_empty() {
            return Err(LedgerError::InvalidField {
                field: "first_name",
                reason: "must not be empty",
            });
        }
        if customer.last_name.trim().is_empty() {
            return Err(LedgerError::InvalidField {
                field: "last_name",
                reason: "must not be empty",
            });
        }
        if !validation::is_valid_email(&customer.email) {
            return Err(LedgerError::InvalidField {
                field: "email",
                reason: "malformed address",
            });
        }
        if !validation::is_valid_phone(&customer.phone_number) {
            return Err(LedgerError::InvalidField {
                field: "phone_number",
                reason: "must be 10-15 digits",
            });
        }
        if !validation::is_valid_pin(&customer.pin) {
            return Err(LedgerError::InvalidField {
                field: "pin",
                reason: "must be exactly 4 digits",
            });
        }
        if !validation::is_valid_date_of_birth(&customer.date_of_birth) {
            return Err(LedgerError::InvalidField {
                field: "date_of_birth",
                reason: "must be DD/MM/YYYY",
            });
        }

        let digest = auth::hash_pin(&customer.pin);
        self.store.create_customer(customer, &digest)
    }

    /// Credential check by customer id. A bad id and a bad PIN are
    /// indistinguishable to the caller.
    pub fn login(&self, customer_id: i64, pin: &str) -> Result<Session> {
        if self.store.verify_login(customer_id, pin)? {
            Ok(Session::new(customer_id))
        } else {
            Err(LedgerError::InvalidCredentials)
        }
    }

    /// Login the way the teller screen does it: by account number. The
    /// returned session has that account selected.
    pub fn login_by_account(&self, account_number: &str, pin: &str) -> Result<Session> {
        let customer_id = match self.store.customer_by_account(account_number) {
            Ok(id) => id,
            Err(LedgerError::AccountNotFound(_)) => return Err(LedgerError::InvalidCredentials),
            Err(e) => return Err(e),
        };
        let mut session = self.login(customer_id, pin)?;
        session.select_account(account_number.to_string());
        Ok(session)
    }

    // ========================================================================
    // ACCOUNT OPENING
    // ========================================================================

    /// Open an account for the session's customer. The opening deposit must
    /// meet the system-wide minimum; the store writes the account row and
    /// the opening ledger entry as one unit.
    pub fn open_account(
        &mut self,
        session: &Session,
        account_type: AccountType,
        initial_deposit: f64,
    ) -> Result<String> {
        if !rules::meets_minimum(initial_deposit) {
            return Err(LedgerError::Rejected {
                kind: TransactionKind::Deposit,
                amount: initial_deposit,
                reason: RejectReason::BelowMinimum,
            });
        }
        self.store
            .create_account(session.customer_id, account_type, initial_deposit)
    }

    // ========================================================================
    // DEPOSIT / WITHDRAWAL
    // ========================================================================

    pub fn deposit(
        &mut self,
        account_number: &str,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let reject = |reason| LedgerError::Rejected {
            kind: TransactionKind::Deposit,
            amount,
            reason,
        };

        if !rules::meets_minimum(amount) {
            return Err(reject(RejectReason::BelowMinimum));
        }

        let account = self.store.get_account(account_number)?;
        if !account.is_active() {
            return Err(reject(RejectReason::AccountNotActive));
        }
        if !rules::can_deposit(&account, amount) {
            return Err(reject(RejectReason::ExceedsBalanceCap));
        }

        let new_balance = rules::new_balance(account.balance, amount, TransactionKind::Deposit);
        self.store.apply_mutation(
            account_number,
            new_balance,
            TransactionKind::Deposit,
            amount,
            description,
        )
    }

    pub fn withdraw(
        &mut self,
        account_number: &str,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let reject = |reason| LedgerError::Rejected {
            kind: TransactionKind::Withdrawal,
            amount,
            reason,
        };

        if !rules::meets_minimum(amount) {
            return Err(reject(RejectReason::BelowMinimum));
        }
        if amount > rules::MAX_WITHDRAWAL_AMOUNT {
            return Err(reject(RejectReason::ExceedsWithdrawalLimit));
        }

        let account = self.store.get_account(account_number)?;
        if !account.is_active() {
            return Err(reject(RejectReason::AccountNotActive));
        }
        if !account.has_sufficient_funds(amount) {
            return Err(reject(RejectReason::InsufficientFunds));
        }

        // Aggregate ceiling over the current UTC day, computed from the
        // ledger itself.
        let withdrawn = self.store.withdrawn_today(account_number)?;
        if withdrawn + amount > rules::MAX_DAILY_WITHDRAWAL {
            info!(%account_number, withdrawn, amount, "daily withdrawal ceiling hit");
            return Err(reject(RejectReason::DailyLimitExceeded));
        }

        let new_balance = rules::new_balance(account.balance, amount, TransactionKind::Withdrawal);
        self.store.apply_mutation(
            account_number,
            new_balance,
            TransactionKind::Withdrawal,
            amount,
            description,
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================
