use anyhow::{bail, Context, Result};
use std::env;

use bastion_ledger::{AccountStore, AccountType, Ledger, NewCustomer, Session};

const DEFAULT_DB_PATH: &str = "bastion.db";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");
    let db_path = args.get(2).cloned().unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

    match command {
        "init" => run_init(&db_path),
        "demo" => run_demo(&db_path),
        "audit" => run_audit(&db_path),
        _ => {
            println!("bastion-ledger {}", bastion_ledger::VERSION);
            println!();
            println!("Usage: bastion-ledger <command> [db-path]");
            println!();
            println!("Commands:");
            println!("  init   Create the database schema at [db-path] (default: {DEFAULT_DB_PATH})");
            println!("  demo   Seed a customer and run a few ledger operations");
            println!("  audit  Replay every account's ledger and compare to the stored balance");
            Ok(())
        }
    }
}

fn run_init(db_path: &str) -> Result<()> {
    AccountStore::open(db_path).with_context(|| format!("failed to open store at {db_path}"))?;
    println!("✓ Store initialized at {db_path}");
    Ok(())
}

fn run_demo(db_path: &str) -> Result<()> {
    let mut store =
        AccountStore::open(db_path).with_context(|| format!("failed to open store at {db_path}"))?;

    let mut ledger = Ledger::new(&mut store);
    let customer_id = ledger.register_customer(&NewCustomer {
        first_name: "Ama".to_string(),
        middle_name: Some("Serwaa".to_string()),
        last_name: "Mensah".to_string(),
        email: format!("ama.mensah+{}@example.com", uuid::Uuid::new_v4().simple()),
        phone_number: "0244123456".to_string(),
        address: "12 Harper Road, Kumasi".to_string(),
        date_of_birth: "01/02/1990".to_string(),
        pin: "4821".to_string(),
    })?;
    println!("✓ Registered customer {customer_id}");

    let session = Session::new(customer_id);
    let account = ledger.open_account(&session, AccountType::Savings, 500.0)?;
    println!("✓ Opened Savings account {account} with a 500.00 opening deposit");

    let receipt = ledger.deposit(&account, 200.0, "Cash deposit")?;
    println!(
        "✓ Deposited {:.2}, balance now {:.2}",
        receipt.amount, receipt.balance_after
    );

    let receipt = ledger.withdraw(&account, 150.0, "Cash withdrawal")?;
    println!(
        "✓ Withdrew {:.2}, balance now {:.2}",
        receipt.amount, receipt.balance_after
    );

    println!("\nLast transactions:");
    for tx in store.transaction_history(&account, 10)? {
        println!(
            "  {:<10} {:>10.2}  balance {:>10.2}  {}",
            tx.kind.as_str(),
            tx.amount,
            tx.balance_after,
            tx.description
        );
    }

    Ok(())
}

fn run_audit(db_path: &str) -> Result<()> {
    let store =
        AccountStore::open(db_path).with_context(|| format!("failed to open store at {db_path}"))?;

    let numbers = store.all_account_numbers()?;
    println!("Auditing {} account(s)...", numbers.len());

    let mut mismatches = 0;
    for number in &numbers {
        let stored = store.account_balance(number)?;
        let replayed = store.replay_balance(number)?;
        if (stored - replayed).abs() > f64::EPSILON {
            eprintln!("✗ {number}: stored {stored:.2} but ledger replays to {replayed:.2}");
            mismatches += 1;
        }
    }

    if mismatches > 0 {
        bail!("{mismatches} account(s) disagree with their ledger");
    }
    println!("✓ Every stored balance matches its ledger replay");
    Ok(())
}
