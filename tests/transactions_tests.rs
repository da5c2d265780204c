// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::models::{NewTransaction, TxnKind};
use tallybook::store::Store;
use tallybook::vault::FieldVault;
use tallybook::{cli, commands::transactions, db};

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

fn seed(store: &Store) {
    let rows = [
        ("2025-01-01", TxnKind::Expense, 10, "cash"),
        ("2025-01-02", TxnKind::Expense, 20, "bank"),
        ("2025-01-03", TxnKind::Income, 30, "cash"),
        ("2025-02-01", TxnKind::Income, 40, "bank"),
    ];
    for (date, kind, amount, method) in rows {
        store
            .insert_transaction(
                1,
                &NewTransaction {
                    date: d(date),
                    kind,
                    amount: Decimal::from(amount),
                    category: "General".to_string(),
                    method: method.to_string(),
                    is_principal: false,
                    loan_id: None,
                    note: None,
                },
            )
            .unwrap();
    }
}

fn list_matches(args: &[&str]) -> clap::ArgMatches {
    let matches = cli::build_cli().get_matches_from(args);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    list_m.clone()
}

#[test]
fn list_limit_respected() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    seed(&store);

    let m = list_matches(&["tallybook", "tx", "list", "--limit", "2"]);
    let rows = transactions::query_rows(&store, 1, &m).unwrap();
    assert_eq!(rows.len(), 2);
    // newest first
    assert_eq!(rows[0].date, "2025-02-01");
}

#[test]
fn list_filters_by_month_and_kind() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    seed(&store);

    let m = list_matches(&["tallybook", "tx", "list", "--month", "2025-01", "--kind", "expense"]);
    let rows = transactions::query_rows(&store, 1, &m).unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.kind == "expense"));
}

#[test]
fn list_filters_by_method_case_insensitively() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    seed(&store);

    let m = list_matches(&["tallybook", "tx", "list", "--method", "CASH"]);
    let rows = transactions::query_rows(&store, 1, &m).unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn negative_amounts_are_rejected() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let err = store
        .insert_transaction(
            1,
            &NewTransaction {
                date: d("2025-01-01"),
                kind: TxnKind::Expense,
                amount: Decimal::from(-5),
                category: "General".to_string(),
                method: "cash".to_string(),
                is_principal: false,
                loan_id: None,
                note: None,
            },
        )
        .unwrap_err();
    assert!(matches!(
        err,
        tallybook::errors::LedgerError::Validation(_)
    ));
}
