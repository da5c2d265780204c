// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::errors::LedgerError;
use tallybook::models::{InterestType, LoanRole, TxnKind, NewLoan};
use tallybook::store::Store;
use tallybook::vault::FieldVault;

fn setup() -> (Connection, FieldVault) {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO profiles(name) VALUES ('main')", [])
        .unwrap();
    (conn, FieldVault::new(&[7u8; 32]))
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn loan_input(role: LoanRole, principal: &str) -> NewLoan {
    NewLoan {
        person: "Asha".to_string(),
        contact: Some("+91 98x".to_string()),
        role,
        principal: principal.parse().unwrap(),
        interest_rate: Decimal::ZERO,
        interest_amount: Decimal::ZERO,
        total_amount: principal.parse().unwrap(),
        interest_type: InterestType::Simple,
        start_date: d("2025-01-10"),
        due_date: d("2025-07-10"),
    }
}

#[test]
fn lent_loan_emits_expense_principal_entry() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan, entry) = store.create_loan(1, &loan_input(LoanRole::Lent, "1000")).unwrap();

    assert_eq!(entry.kind, TxnKind::Expense);
    assert_eq!(entry.amount, Decimal::from(1000));
    assert_eq!(entry.category, "loan principal");
    assert_eq!(entry.method, "loan");
    assert!(entry.is_principal);
    assert_eq!(entry.loan_id, Some(loan.id));
    assert_eq!(entry.note.as_deref(), Some("Loan given to Asha"));
    assert!(!loan.settled);
}

#[test]
fn borrowed_loan_emits_income_principal_entry() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan, entry) = store
        .create_loan(1, &loan_input(LoanRole::Borrowed, "2500"))
        .unwrap();

    assert_eq!(entry.kind, TxnKind::Income);
    assert_eq!(entry.amount, Decimal::from(2500));
    assert_eq!(entry.category, "Borrowed principal");
    assert_eq!(entry.method, "Borrow");
    assert!(entry.is_principal);
    assert_eq!(entry.loan_id, Some(loan.id));
    assert_eq!(entry.note.as_deref(), Some("Loan borrowed from Asha"));
}

#[test]
fn creation_writes_exactly_one_entry() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    store.create_loan(1, &loan_input(LoanRole::Lent, "1000")).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn non_positive_principal_rejected_without_state_change() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let err = store
        .create_loan(1, &loan_input(LoanRole::Lent, "0"))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    let loans: i64 = conn
        .query_row("SELECT COUNT(*) FROM loans", [], |r| r.get(0))
        .unwrap();
    let txns: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!((loans, txns), (0, 0));
}

#[test]
fn due_date_before_start_rejected() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let mut input = loan_input(LoanRole::Lent, "100");
    input.due_date = d("2024-12-31");
    let err = store.create_loan(1, &input).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn unknown_role_is_a_validation_error() {
    assert!(matches!(
        LoanRole::parse("gifted"),
        Err(LedgerError::Validation(_))
    ));
}

#[test]
fn confidential_columns_are_opaque_at_rest() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan, _) = store.create_loan(1, &loan_input(LoanRole::Lent, "1000")).unwrap();

    let (person_raw, principal_raw): (String, String) = conn
        .query_row(
            "SELECT person, principal FROM loans WHERE id=?1",
            [loan.id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert!(person_raw.starts_with("enc1:"));
    assert!(principal_raw.starts_with("enc1:"));

    // and the decoded read round-trips
    let read = store.find_loan(1, loan.id).unwrap();
    assert_eq!(read.person, "Asha");
    assert_eq!(read.principal, Decimal::from(1000));
}

#[test]
fn interest_preview_matches_the_agreed_terms() {
    use tallybook::commands::loans::computed_interest;

    // 12% simple on 1000 over six whole months
    let (interest, total) = computed_interest(
        Decimal::from(1000),
        Decimal::from(12),
        InterestType::Simple,
        d("2025-01-10"),
        d("2025-07-10"),
    );
    assert_eq!(interest, "60.00".parse().unwrap());
    assert_eq!(total, "1060.00".parse().unwrap());

    // monthly compounding beats simple for the same terms
    let (compound, _) = computed_interest(
        Decimal::from(1000),
        Decimal::from(12),
        InterestType::Monthly,
        d("2025-01-10"),
        d("2025-07-10"),
    );
    assert!(compound > interest);

    // a same-month due date accrues nothing
    let (zero, total) = computed_interest(
        Decimal::from(1000),
        Decimal::from(12),
        InterestType::Simple,
        d("2025-01-10"),
        d("2025-01-20"),
    );
    assert_eq!(zero, Decimal::ZERO.round_dp(2));
    assert_eq!(total, Decimal::from(1000) + zero);
}

#[test]
fn loans_are_invisible_across_profiles() {
    let (conn, vault) = setup();
    conn.execute("INSERT INTO profiles(name) VALUES ('other')", [])
        .unwrap();
    let store = Store::new(&conn, &vault);
    let (loan, _) = store.create_loan(1, &loan_input(LoanRole::Lent, "1000")).unwrap();

    assert!(store.loans(2).unwrap().is_empty());
    // wrong owner reads the same as missing
    assert!(matches!(
        store.find_loan(2, loan.id),
        Err(LedgerError::NotFound)
    ));
}
