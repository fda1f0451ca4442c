// Account store - durable repository of customers, accounts, and the
// append-only transaction ledger, over a single SQLite connection.
//
// Mutating methods take &mut self, so one store handle never interleaves
// writers; the balance-update + ledger-append pair always runs inside one
// SQLite transaction so the stored balance and the history cannot drift
// apart.

use chrono::{DateTime, Utc};
use rand::Rng;
use rusqlite::{params, Connection};
use std::path::Path;
use tracing::{info, warn};

use crate::auth;
use crate::entities::{
    Account, AccountStatus, AccountSummary, AccountType, Customer, NewCustomer, Transaction,
    TransactionKind,
};
use crate::error::{LedgerError, Result};
use crate::rules::MAXIMUM_BALANCE;

/// Attempts at claiming a freshly sampled account number before giving up.
/// A collision needs a concurrent opener to win the same 9-digit sample in
/// the window between the existence check and the insert.
const MAX_NUMBER_ATTEMPTS: u32 = 8;

pub struct AccountStore {
    conn: Connection,
}

impl AccountStore {
    // ========================================================================
    // OPEN / SCHEMA
    // ========================================================================

    /// Open (or create) the store at `path`. Fails once, at startup; a
    /// store that opened stays usable for the life of the process.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests and the demo command.
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // WAL for crash recovery; foreign keys so no row is ever orphaned.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::setup_schema(&conn)?;
        Ok(AccountStore { conn })
    }

    fn setup_schema(conn: &Connection) -> Result<()> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS customers (
                customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                middle_name TEXT,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                phone_number TEXT NOT NULL,
                address TEXT NOT NULL,
                date_of_birth TEXT NOT NULL,
                pin TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                account_number TEXT PRIMARY KEY,
                customer_id INTEGER NOT NULL,
                account_type TEXT NOT NULL,
                balance REAL NOT NULL DEFAULT 0.0,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                created_at TEXT NOT NULL,
                FOREIGN KEY (customer_id) REFERENCES customers (customer_id)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                transaction_id INTEGER PRIMARY KEY AUTOINCREMENT,
                account_number TEXT NOT NULL,
                transaction_type TEXT NOT NULL,
                amount REAL NOT NULL,
                balance_after REAL NOT NULL,
                description TEXT,
                transaction_date TEXT NOT NULL,
                FOREIGN KEY (account_number) REFERENCES accounts (account_number)
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_accounts_customer ON accounts(customer_id)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_transactions_account
             ON transactions(account_number, transaction_id)",
            [],
        )?;

        Ok(())
    }

    // ========================================================================
    // CUSTOMERS
    // ========================================================================

    /// Insert a customer row and return the assigned id. The PIN must
    /// already be a salted digest; format validation happens upstream,
    /// uniqueness is enforced here.
    pub fn create_customer(&mut self, customer: &NewCustomer, pin_digest: &str) -> Result<i64> {
        let result = self.conn.execute(
            "INSERT INTO customers (
                first_name, middle_name, last_name, email, phone_number,
                address, date_of_birth, pin, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                customer.first_name,
                customer.middle_name,
                customer.last_name,
                customer.email,
                customer.phone_number,
                customer.address,
                customer.date_of_birth,
                pin_digest,
                Utc::now().to_rfc3339(),
            ],
        );

        match result {
            Ok(_) => {
                let customer_id = self.conn.last_insert_rowid();
                info!(customer_id, "customer created");
                Ok(customer_id)
            }
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                warn!(email = %customer.email, "duplicate email rejected");
                Err(LedgerError::DuplicateEmail(customer.email.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn customer_info(&self, customer_id: i64) -> Result<Customer> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, first_name, middle_name, last_name, email,
                    phone_number, address, date_of_birth, created_at
             FROM customers WHERE customer_id = ?1",
        )?;

        let row = stmt
            .query_map(params![customer_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            })?
            .next()
            .transpose()?
            .ok_or(LedgerError::CustomerNotFound(customer_id))?;

        Ok(Customer {
            customer_id: row.0,
            first_name: row.1,
            middle_name: row.2,
            last_name: row.3,
            email: row.4,
            phone_number: row.5,
            address: row.6,
            date_of_birth: row.7,
            created_at: parse_timestamp(&row.8, "customers")?,
        })
    }

    /// Owning customer of an account, for login by account number.
    pub fn customer_by_account(&self, account_number: &str) -> Result<i64> {
        let mut stmt = self
            .conn
            .prepare("SELECT customer_id FROM accounts WHERE account_number = ?1")?;

        let customer_id = stmt
            .query_map(params![account_number], |row| row.get::<_, i64>(0))?
            .next()
            .transpose()?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()));
        customer_id
    }

    /// Salted-digest comparison against the stored PIN. An unknown
    /// customer id verifies as false rather than erroring, so the caller
    /// cannot distinguish a bad id from a bad PIN.
    pub fn verify_login(&self, customer_id: i64, pin: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT pin FROM customers WHERE customer_id = ?1")?;

        let stored = stmt
            .query_map(params![customer_id], |row| row.get::<_, String>(0))?
            .next()
            .transpose()?;

        Ok(match stored {
            Some(digest) => auth::verify_pin(pin, &digest),
            None => false,
        })
    }

    // ========================================================================
    // ACCOUNT NUMBERS
    // ========================================================================

    pub fn account_exists(&self, account_number: &str) -> Result<bool> {
        let mut stmt = self
            .conn
            .prepare("SELECT 1 FROM accounts WHERE account_number = ?1")?;
        Ok(stmt.exists(params![account_number])?)
    }

    /// Uniform 9-digit sample, re-drawn while the candidate is already
    /// taken. The account insert still fails atomically on the primary key
    /// if another opener claims the same number after this check.
    pub fn generate_account_number(&self) -> Result<String> {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = rng.gen_range(100_000_000u32..=999_999_999).to_string();
            if !self.account_exists(&candidate)? {
                return Ok(candidate);
            }
        }
    }

    // ========================================================================
    // ACCOUNTS
    // ========================================================================

    /// Allocate a fresh account number and insert the account, Active, with
    /// the given opening balance. A positive opening balance writes the
    /// "Initial deposit" ledger entry in the same SQLite transaction: the
    /// account row and its opening entry commit together or not at all.
    pub fn create_account(
        &mut self,
        customer_id: i64,
        account_type: AccountType,
        initial_balance: f64,
    ) -> Result<String> {
        if !(0.0..=MAXIMUM_BALANCE).contains(&initial_balance) {
            return Err(LedgerError::InvalidField {
                field: "initial_balance",
                reason: "must be within [0, 1000000]",
            });
        }
        // Resolve the FK up front so a constraint failure below can only
        // mean a lost race on the account number.
        self.customer_info(customer_id)?;

        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let account_number = self.generate_account_number()?;
            let now = Utc::now().to_rfc3339();

            let tx = self.conn.transaction()?;
            let inserted = tx.execute(
                "INSERT INTO accounts (account_number, customer_id, account_type,
                                       balance, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    account_number,
                    customer_id,
                    account_type.as_str(),
                    initial_balance,
                    AccountStatus::Active.as_str(),
                    now,
                ],
            );

            match inserted {
                Ok(_) => {
                    if initial_balance > 0.0 {
                        tx.execute(
                            "INSERT INTO transactions (account_number, transaction_type,
                                                       amount, balance_after, description,
                                                       transaction_date)
                             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                            params![
                                account_number,
                                TransactionKind::Deposit.as_str(),
                                initial_balance,
                                initial_balance,
                                "Initial deposit",
                                now,
                            ],
                        )?;
                    }
                    tx.commit()?;
                    info!(%account_number, customer_id, "account opened");
                    return Ok(account_number);
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    warn!(%account_number, "account number collision, resampling");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(LedgerError::DuplicateAccountNumber(
            "exhausted account number attempts".to_string(),
        ))
    }

    pub fn get_account(&self, account_number: &str) -> Result<Account> {
        let mut stmt = self.conn.prepare(
            "SELECT account_number, customer_id, account_type, balance, status, created_at
             FROM accounts WHERE account_number = ?1",
        )?;

        let row = stmt
            .query_map(params![account_number], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .next()
            .transpose()?
            .ok_or_else(|| LedgerError::AccountNotFound(account_number.to_string()))?;

        Ok(Account {
            account_number: row.0,
            customer_id: row.1,
            account_type: parse_account_type(&row.2)?,
            balance: row.3,
            status: parse_status(&row.4)?,
            created_at: parse_timestamp(&row.5, "accounts")?,
        })
    }

    pub fn account_balance(&self, account_number: &str) -> Result<f64> {
        Ok(self.get_account(account_number)?.balance)
    }

    /// Active accounts owned by a customer, as typed summaries.
    pub fn customer_accounts(&self, customer_id: i64) -> Result<Vec<AccountSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_number, account_type, balance
             FROM accounts
             WHERE customer_id = ?1 AND status = 'ACTIVE'
             ORDER BY created_at, account_number",
        )?;

        let rows = stmt
            .query_map(params![customer_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(number, ty, balance)| {
                Ok(AccountSummary {
                    account_number: number,
                    account_type: parse_account_type(&ty)?,
                    balance,
                    low_balance: balance < AccountSummary::LOW_BALANCE_THRESHOLD,
                })
            })
            .collect()
    }

    /// Unconditional balance overwrite. The rules engine has already
    /// validated the transition; no re-validation happens here. Deposits
    /// and withdrawals must go through `apply_mutation` instead so the
    /// ledger entry lands in the same transaction.
    pub fn update_balance(&mut self, account_number: &str, new_balance: f64) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE accounts SET balance = ?1 WHERE account_number = ?2",
            params![new_balance, account_number],
        )?;
        if updated == 0 {
            return Err(LedgerError::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    /// Raw status overwrite. Transitions carry no policy in this core
    /// beyond being representable; administrative processes own them.
    pub fn update_status(&mut self, account_number: &str, status: AccountStatus) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE accounts SET status = ?1 WHERE account_number = ?2",
            params![status.as_str(), account_number],
        )?;
        if updated == 0 {
            return Err(LedgerError::AccountNotFound(account_number.to_string()));
        }
        Ok(())
    }

    // ========================================================================
    // LEDGER
    // ========================================================================

    /// Append one immutable ledger row and return it.
    pub fn record_transaction(
        &mut self,
        account_number: &str,
        kind: TransactionKind,
        amount: f64,
        balance_after: f64,
        description: &str,
    ) -> Result<Transaction> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO transactions (account_number, transaction_type, amount,
                                       balance_after, description, transaction_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account_number,
                kind.as_str(),
                amount,
                balance_after,
                description,
                now.to_rfc3339(),
            ],
        )?;

        Ok(Transaction {
            transaction_id: self.conn.last_insert_rowid(),
            account_number: account_number.to_string(),
            kind,
            amount,
            balance_after,
            description: description.to_string(),
            transaction_date: now,
        })
    }

    /// The balance overwrite and the ledger append as one unit: either both
    /// commit or neither is observably applied. Every deposit and
    /// withdrawal in the system funnels through here.
    pub fn apply_mutation(
        &mut self,
        account_number: &str,
        new_balance: f64,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let now = Utc::now();
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE accounts SET balance = ?1 WHERE account_number = ?2",
            params![new_balance, account_number],
        )?;
        if updated == 0 {
            // Dropping the transaction rolls the update attempt back.
            return Err(LedgerError::AccountNotFound(account_number.to_string()));
        }

        tx.execute(
            "INSERT INTO transactions (account_number, transaction_type, amount,
                                       balance_after, description, transaction_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account_number,
                kind.as_str(),
                amount,
                new_balance,
                description,
                now.to_rfc3339(),
            ],
        )?;
        let transaction_id = tx.last_insert_rowid();
        tx.commit()?;

        info!(%account_number, kind = kind.as_str(), amount, new_balance, "mutation applied");

        Ok(Transaction {
            transaction_id,
            account_number: account_number.to_string(),
            kind,
            amount,
            balance_after: new_balance,
            description: description.to_string(),
            transaction_date: now,
        })
    }

    /// Most recent first, bounded by `limit`. Read-only and restartable:
    /// absent writes, repeated calls return the same view.
    pub fn transaction_history(
        &self,
        account_number: &str,
        limit: u32,
    ) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_id, account_number, transaction_type, amount,
                    balance_after, description, transaction_date
             FROM transactions
             WHERE account_number = ?1
             ORDER BY transaction_id DESC
             LIMIT ?2",
        )?;

        let rows = stmt
            .query_map(params![account_number, limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| {
                Ok(Transaction {
                    transaction_id: row.0,
                    account_number: row.1,
                    kind: parse_kind(&row.2)?,
                    amount: row.3,
                    balance_after: row.4,
                    description: row.5.unwrap_or_default(),
                    transaction_date: parse_timestamp(&row.6, "transactions")?,
                })
            })
            .collect()
    }

    /// Sum of an account's withdrawals within the current UTC day, for the
    /// daily aggregate ceiling.
    pub fn withdrawn_today(&self, account_number: &str) -> Result<f64> {
        let today = Utc::now().format("%Y-%m-%d").to_string();
        let total: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0)
             FROM transactions
             WHERE account_number = ?1
               AND transaction_type = 'WITHDRAWAL'
               AND substr(transaction_date, 1, 10) = ?2",
            params![account_number, today],
            |row| row.get(0),
        )?;
        Ok(total)
    }

    /// Recompute the balance by replaying the account's ledger in
    /// chronological order. Must equal the stored balance for every
    /// account; the audit command and the tests lean on this.
    pub fn replay_balance(&self, account_number: &str) -> Result<f64> {
        let mut stmt = self.conn.prepare(
            "SELECT transaction_type, amount
             FROM transactions
             WHERE account_number = ?1
             ORDER BY transaction_id ASC",
        )?;

        let rows = stmt
            .query_map(params![account_number], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let mut balance = 0.0;
        for (kind, amount) in rows {
            balance += parse_kind(&kind)?.signum() * amount;
        }
        Ok(balance)
    }

    /// Every account number in the store, for ledger-wide audits.
    pub fn all_account_numbers(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT account_number FROM accounts ORDER BY account_number")?;
        let numbers = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(numbers)
    }
}

// ============================================================================
// ROW DECODING
// ============================================================================

fn parse_timestamp(raw: &str, table: &'static str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LedgerError::CorruptRow {
            table,
            detail: format!("bad timestamp {raw:?}: {e}"),
        })
}

fn parse_account_type(raw: &str) -> Result<AccountType> {
    AccountType::parse(raw).ok_or_else(|| LedgerError::CorruptRow {
        table: "accounts",
        detail: format!("unknown account type {raw:?}"),
    })
}

fn parse_status(raw: &str) -> Result<AccountStatus> {
    AccountStatus::parse(raw).ok_or_else(|| LedgerError::CorruptRow {
        table: "accounts",
        detail: format!("unknown status {raw:?}"),
    })
}

fn parse_kind(raw: &str) -> Result<TransactionKind> {
    TransactionKind::parse(raw).ok_or_else(|| LedgerError::CorruptRow {
        table: "transactions",
        detail: format!("unknown transaction type {raw:?}"),
    })
}

// ============================================================================
// TESTS
// ============================================================================
