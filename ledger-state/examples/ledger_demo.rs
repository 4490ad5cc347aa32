//! Example demonstrating basic ledger functionality

use ledger_core::TxKind;
use ledger_state::{Keypair, LedgerConfig, SharedLedger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    println!("In-Memory Ledger Demo");
    println!("=====================");

    // One explicitly owned ledger instance, batch threshold 2
    let service = SharedLedger::new(LedgerConfig::default())?;

    println!("\n1. Registering accounts (opening balance 10)...");
    for i in 0..4 {
        let name = format!("testuser{i}");
        service.create_account(
            &name,
            &format!("password{i}"),
            &format!("user{i}@test.com"),
            Keypair::generate(),
            10,
        )?;
        println!("   registered {name}");
    }

    println!("\n2. Genesis block:");
    let blocks = service.list_blocks();
    println!("   hash: {}", blocks[0].hash);
    println!("   parent: {}", blocks[0].parent_root);

    println!("\n3. Submitting transactions...");
    let transfers = [
        ("testuser0", "testuser1", 5),
        ("testuser1", "testuser2", 3),
        ("testuser2", "testuser3", 1),
        ("testuser3", "testuser0", 50), // overdraft, recorded as inert
        ("testuser0", "testuser2", 2),
        ("testuser3", "testuser1", 4),
    ];
    for (sender, receiver, value) in transfers {
        let outcome = service.submit_transaction(TxKind::Send, sender, receiver, value, "", None)?;
        println!("   {sender} -> {receiver} ({value}): {outcome:?}");
    }

    service.submit_transaction(
        TxKind::SignedMessage,
        "testuser1",
        "testuser0",
        0,
        "thanks for the transfer",
        None,
    )?;

    println!("\n4. Chain contents:");
    for block in service.list_blocks() {
        println!("{}", serde_json::to_string_pretty(&block)?);
    }

    println!("\n5. Accounts:");
    for account in service.list_accounts() {
        println!(
            "   {} balance={} inbox={}",
            account.username,
            account.balance,
            account.mailbox.len()
        );
    }

    println!("\n6. Chain integrity:");
    match service.verify() {
        Ok(()) => println!("   Valid"),
        Err(fault) => println!("   Invalid: {fault}"),
    }

    Ok(())
}
