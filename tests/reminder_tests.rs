// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tallybook::db;
use tallybook::models::{InterestType, LoanRole, NewLoan, ReminderStage};
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

fn make_loan(store: &Store) -> i64 {
    let (loan, _) = store
        .create_loan(
            1,
            &NewLoan {
                person: "Asha".to_string(),
                contact: None,
                role: LoanRole::Lent,
                principal: Decimal::from(100),
                interest_rate: Decimal::ZERO,
                interest_amount: Decimal::ZERO,
                total_amount: Decimal::from(100),
                interest_type: InterestType::Simple,
                start_date: d("2025-01-10"),
                due_date: d("2025-07-10"),
            },
        )
        .unwrap();
    loan.id
}

#[test]
fn stages_advance_forward() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let id = make_loan(&store);

    let loan = store.advance_reminder(1, id, ReminderStage::SevenDays).unwrap();
    assert_eq!(loan.reminder_stage, ReminderStage::SevenDays);
    let loan = store.advance_reminder(1, id, ReminderStage::DueDate).unwrap();
    assert_eq!(loan.reminder_stage, ReminderStage::DueDate);
}

#[test]
fn stages_never_move_backwards() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let id = make_loan(&store);

    store.advance_reminder(1, id, ReminderStage::ThreeDays).unwrap();
    let loan = store.advance_reminder(1, id, ReminderStage::SevenDays).unwrap();
    assert_eq!(loan.reminder_stage, ReminderStage::ThreeDays);
}

#[test]
fn settled_loans_are_left_alone() {
    let (conn, vault) = setup();
    let store = Store::new(&conn, &vault);
    let id = make_loan(&store);
    store
        .settle_loan(1, id, Decimal::from(100), d("2025-07-01"))
        .unwrap();

    let loan = store.advance_reminder(1, id, ReminderStage::DueDate).unwrap();
    assert_eq!(loan.reminder_stage, ReminderStage::None);
}
