// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::models::{InterestType, LoanRole, NewLoan, NewTransaction, TxnKind};
use tallybook::store::{DeleteOutcome, Store};
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

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn settled_loan_with_interest(store: &Store) -> (i64, Vec<i64>) {
    let (loan, _) = store
        .create_loan(
            1,
            &NewLoan {
                person: "Asha".to_string(),
                contact: None,
                role: LoanRole::Lent,
                principal: dec("1000"),
                interest_rate: dec("10"),
                interest_amount: dec("150"),
                total_amount: dec("1150"),
                interest_type: InterestType::Simple,
                start_date: d("2025-01-10"),
                due_date: d("2025-07-10"),
            },
        )
        .unwrap();
    store
        .settle_loan(1, loan.id, dec("1150"), d("2025-07-01"))
        .unwrap();
    let ids = store
        .transactions(1)
        .unwrap()
        .into_iter()
        .filter(|t| t.loan_id == Some(loan.id))
        .map(|t| t.id)
        .collect();
    (loan.id, ids)
}

fn counts(conn: &Connection) -> (i64, i64) {
    let loans: i64 = conn
        .query_row("SELECT COUNT(*) FROM loans", [], |r| r.get(0))
        .unwrap();
    let txns: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    (loans, txns)
}

#[test]
fn deleting_a_loan_removes_all_linked_entries() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan_id, entry_ids) = settled_loan_with_interest(&store);
    assert_eq!(entry_ids.len(), 3); // creation + principal + interest

    store.delete_loan(1, loan_id).unwrap();
    assert_eq!(counts(&conn), (0, 0));
}

#[test]
fn deleting_a_principal_entry_removes_the_loan_and_siblings() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan_id, _) = settled_loan_with_interest(&store);

    let principal_entry = store
        .transactions(1)
        .unwrap()
        .into_iter()
        .find(|t| t.loan_id == Some(loan_id) && t.is_principal)
        .unwrap();
    let outcome = store.delete_transaction(1, principal_entry.id).unwrap();
    assert!(matches!(outcome, DeleteOutcome::TransactionAndLoan));
    assert_eq!(counts(&conn), (0, 0));
}

#[test]
fn deleting_an_interest_entry_also_removes_the_loan() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (loan_id, _) = settled_loan_with_interest(&store);

    let interest_entry = store
        .transactions(1)
        .unwrap()
        .into_iter()
        .find(|t| t.loan_id == Some(loan_id) && !t.is_principal)
        .unwrap();
    let outcome = store.delete_transaction(1, interest_entry.id).unwrap();
    assert!(matches!(outcome, DeleteOutcome::TransactionAndLoan));
    assert_eq!(counts(&conn), (0, 0));
}

#[test]
fn deleting_a_manual_entry_touches_nothing_else() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let (_, _) = settled_loan_with_interest(&store);
    let id = store
        .insert_transaction(
            1,
            &NewTransaction {
                date: d("2025-08-01"),
                kind: TxnKind::Expense,
                amount: dec("25"),
                category: "Food".to_string(),
                method: "cash".to_string(),
                is_principal: false,
                loan_id: None,
                note: None,
            },
        )
        .unwrap();

    let outcome = store.delete_transaction(1, id).unwrap();
    assert!(matches!(outcome, DeleteOutcome::Transaction));
    assert_eq!(counts(&conn), (1, 3));
}

#[test]
fn removing_a_profile_cascades_to_its_records() {
    let (conn, vault) = setup();
    conn.execute("INSERT INTO profiles(name) VALUES ('other')", [])
        .unwrap();
    let store = Store::new(&conn, &vault);
    settled_loan_with_interest(&store);
    store
        .insert_transaction(
            2,
            &NewTransaction {
                date: d("2025-08-01"),
                kind: TxnKind::Income,
                amount: dec("10"),
                category: "General".to_string(),
                method: "cash".to_string(),
                is_principal: false,
                loan_id: None,
                note: None,
            },
        )
        .unwrap();

    conn.execute("DELETE FROM profiles WHERE name='main'", [])
        .unwrap();
    assert_eq!(counts(&conn), (0, 1));
    assert_eq!(store.transactions(2).unwrap().len(), 1);
}
