use crab_bank::cli::Shell;
use crab_bank::config::Config;
use crab_bank::engine::{
    AccountAttribute, AccountOperationError, AccountStatus, Amount, HISTORY_HEADER,
    REPORT_HEADER, TransactionType,
};
use crab_bank::session::{SearchCriterion, Session, SessionError};
use std::fs;
use tempfile::tempdir;

fn amount(s: &str) -> Amount {
    s.parse().unwrap()
}

fn opened_session() -> Session {
    let mut session = Session::new();
    session
        .open_account("40201810000000000001", "044525225", "770701001")
        .unwrap();
    session
}

/// Feeds `script` to a fresh shell and returns the session and everything printed.
fn run_script(script: &str, config: Config) -> (Session, String) {
    let mut shell = Shell::new(Session::new(), config, script.as_bytes(), Vec::new());
    shell.run().unwrap();
    let (session, output) = shell.into_parts();
    (session, String::from_utf8(output).unwrap())
}

#[test]
fn test_salary_and_rent_scenario() {
    let mut session = opened_session();

    session.deposit(amount("500.00"), "salary").unwrap();
    session.withdraw(amount("200.00"), "rent").unwrap();

    assert_eq!(session.balance().unwrap(), amount("300.00"));
    let kinds: Vec<_> = session.transactions().unwrap().iter().map(|t| t.typ()).collect();
    assert_eq!(
        kinds,
        [
            TransactionType::AccountOpened,
            TransactionType::Deposit,
            TransactionType::Withdrawal
        ]
    );
}

#[test]
fn test_withdraw_above_maximum_is_rejected() {
    let mut session = opened_session();
    session.deposit(amount("500"), "").unwrap();

    let result = session.withdraw(amount("1000000.01"), "");

    assert!(matches!(
        result,
        Err(SessionError::Account(AccountOperationError::AmountTooLarge))
    ));
    assert_eq!(session.balance().unwrap(), amount("500"));
    assert_eq!(session.transactions().unwrap().len(), 2);
}

#[test]
fn test_close_requires_empty_account() {
    let mut session = opened_session();
    session.deposit(amount("500.00"), "salary").unwrap();
    session.withdraw(amount("200.00"), "rent").unwrap();

    assert!(matches!(
        session.close_account(),
        Err(SessionError::Account(AccountOperationError::NonZeroBalance { .. }))
    ));
    assert_eq!(session.transactions().unwrap().len(), 3);

    session.withdraw(amount("300.00"), "").unwrap();
    assert_eq!(session.balance().unwrap(), Amount::ZERO);
    session.close_account().unwrap();

    assert!(session.active_account().is_none());
    let account = session
        .search_accounts(AccountAttribute::Number, "40201810000000000001")
        .next()
        .unwrap();
    assert_eq!(account.status(), AccountStatus::Closed);
    assert_eq!(account.transactions().len(), 5);
    assert_eq!(
        account.transactions().last().map(|t| t.typ()),
        Some(TransactionType::AccountClosed)
    );
}

#[test]
fn test_over_withdrawal_changes_nothing() {
    let mut session = opened_session();
    session.deposit(amount("10"), "").unwrap();

    let result = session.withdraw(amount("10.01"), "");

    assert!(matches!(
        result,
        Err(SessionError::Account(AccountOperationError::InsufficientFunds { .. }))
    ));
    assert_eq!(session.balance().unwrap(), amount("10"));
    assert_eq!(session.transactions().unwrap().len(), 2);
}

#[test]
fn test_amount_search_tolerance() {
    let mut session = opened_session();
    session.deposit(amount("100.0005"), "odd amount").unwrap();

    let close = SearchCriterion::Amount(amount("100.001"));
    let far = SearchCriterion::Amount(amount("100.01"));

    assert_eq!(session.search_transactions(&close).unwrap().count(), 1);
    assert_eq!(session.search_transactions(&far).unwrap().count(), 0);
}

#[test]
fn test_text_export_writes_header_and_one_line_per_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bank_data.txt");
    let mut session = opened_session();
    session.deposit(amount("500.00"), "salary").unwrap();
    session.withdraw(amount("200.00"), "rent").unwrap();

    session.export_to_text(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], REPORT_HEADER);
    assert_eq!(lines[4], "Balance: 300.00 RUB");
    assert_eq!(lines[5], HISTORY_HEADER);

    let history = &lines[6..];
    assert_eq!(history.len(), 3);
    for (line, tx) in history.iter().zip(session.transactions().unwrap()) {
        let expected = format!(
            "{}: {} RUB — {} ({})",
            tx.typ().label(),
            tx.amount(),
            tx.description(),
            tx.formatted_timestamp()
        );
        assert_eq!(*line, expected);
    }
}

#[test]
fn test_export_overwrites_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bank_data.txt");
    fs::write(&path, "stale content\n".repeat(50)).unwrap();

    opened_session().export_to_text(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(!text.contains("stale"));
    assert_eq!(text.lines().count(), 7);
}

#[test]
fn test_export_to_unwritable_destination_is_reported() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing").join("bank_data.txt");
    let session = opened_session();

    assert!(matches!(session.export_to_text(&missing), Err(SessionError::Io(_))));
    assert!(matches!(session.export_to_csv(&missing), Err(SessionError::Io(_))));
}

#[test]
fn test_shell_full_walkthrough() {
    let dir = tempdir().unwrap();
    let script = [
        "1", "40201810000000000001", "044525225", "770701001", // open
        "2", "500.00", "salary", // deposit
        "3", "200.00", "rent", // withdraw
        "4", // balance
        "6", "3", "SAL", // search description
        "7", // export
        "8", // close rejected
        "3", "300", "", // withdraw everything
        "8", // close
        "9", "2", "044525225", // search accounts by BIK
        "0",
    ]
    .join("\n");

    let (session, output) = run_script(&script, Config::in_dir(dir.path()));

    assert!(output.contains("Account opened. Account number: 40201810000000000001"));
    assert!(output.contains("Current balance: 300.00 RUB"));
    assert!(output.contains("Search results:"));
    assert!(output.contains("DEPOSIT: 500.00 RUB — salary ("));
    assert!(output.contains("Error: Account still holds 300.00, withdraw all funds first"));
    assert!(output.contains("Account closed."));
    assert!(output.contains("Status: Closed"));
    assert!(output.contains("Transactions: 5"));
    assert!(output.trim_end().ends_with("Exiting..."));

    assert!(session.active_account().is_none());
    assert_eq!(session.registry().len(), 1);

    let exported = fs::read_to_string(dir.path().join("bank_data.txt")).unwrap();
    assert_eq!(exported.lines().count(), 6 + 3);
}

#[test]
fn test_shell_recovers_from_bad_input() {
    let script = [
        "abc", // not a number
        "42",  // not a menu item
        "2",   // deposit without an account
        "1", "1", "bik", "kpp",
        "2", "lots", // not an amount
        "2", "0", // below minimum
        "3", "5", // more than balance
        "6", "7", // unknown search type
        "2", "15.5", "   ",
        "5",
    ]
    .join("\n");

    let (session, output) = run_script(&script, Config::default());

    assert!(output.contains("Error: Expected a number, got 'abc'"));
    assert!(output.contains("Error: Unknown menu item 42"));
    assert!(output.contains("Error: No active account"));
    assert!(output.contains("Error: Expected an amount such as 150.25, got 'lots'"));
    assert!(output.contains("Error: Amount must be at least 0.01"));
    assert!(output.contains("Error: Insufficient funds, available: 0.00"));
    assert!(output.contains("Error: Unknown search type 7"));
    assert!(output.contains("2. DEPOSIT: 15.50 RUB — Account deposit ("));
    // input ran out without an explicit exit
    assert!(output.trim_end().ends_with("Exiting..."));

    assert_eq!(session.balance().unwrap(), amount("15.5"));
    assert_eq!(session.transactions().unwrap().len(), 2);
}

#[test]
fn test_shell_rejects_second_open_before_prompting() {
    let script = ["1", "A", "b", "k", "1", "9", "1", "a"].join("\n");

    let (session, output) = run_script(&script, Config::default());

    assert!(output.contains("Error: Account A is already open"));
    assert_eq!(session.registry().len(), 1);
    // "9" is read as a menu choice again, then finds "a" case-insensitively
    assert!(output.contains("Number: A"));
}

#[test]
fn test_shell_search_accounts_with_empty_registry() {
    let (_, output) = run_script("9\n0\n", Config::default());

    assert!(output.contains("Error: No accounts to search"));
}

#[test]
fn test_shell_csv_export() {
    let dir = tempdir().unwrap();
    let script = ["1", "1", "b", "k", "2", "10", "coffee, beans", "10", "0"].join("\n");

    let (_, output) = run_script(&script, Config::in_dir(dir.path()));

    assert!(output.contains("Ledger exported to"));
    let csv = fs::read_to_string(dir.path().join("bank_ledger.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "type,amount,description,timestamp");
    assert!(lines[2].starts_with("DEPOSIT,10.00,\"coffee, beans\","));
}
