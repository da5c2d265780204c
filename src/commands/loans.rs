// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{InterestType, LoanRole, NewLoan, ReminderStage};
use crate::store::{SettleOutcome, Store};
use crate::utils::{active_profile, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use crate::vault::FieldVault;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, vault: &FieldVault, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, vault, sub)?,
        Some(("list", sub)) => list(conn, vault, sub)?,
        Some(("settle", sub)) => settle(conn, vault, sub)?,
        Some(("edit", sub)) => edit(conn, vault, sub)?,
        Some(("rm", sub)) => rm(conn, vault, sub)?,
        Some(("due", _)) => due(conn, vault)?,
        _ => {}
    }
    Ok(())
}

fn whole_months(start: NaiveDate, due: NaiveDate) -> i64 {
    let months =
        (due.year() as i64 - start.year() as i64) * 12 + due.month() as i64 - start.month() as i64;
    months.max(0)
}

/// Interest preview computed here at the edge, persisted as given. The
/// settlement engine never re-derives it; only the paid amount counts.
pub fn computed_interest(
    principal: Decimal,
    rate: Decimal,
    interest_type: InterestType,
    start: NaiveDate,
    due: NaiveDate,
) -> (Decimal, Decimal) {
    let months = whole_months(start, due);
    let interest = match interest_type {
        InterestType::Simple => {
            principal * rate * Decimal::from(months) / Decimal::from(1200)
        }
        InterestType::Monthly => {
            // annual rate compounded per whole month
            let monthly = Decimal::ONE + rate / Decimal::from(1200);
            let mut factor = Decimal::ONE;
            for _ in 0..months {
                factor *= monthly;
            }
            principal * factor - principal
        }
    };
    let interest = interest.round_dp(2);
    (interest, principal + interest)
}

fn add(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let person = sub.get_one::<String>("person").unwrap().trim().to_string();
    let contact = sub.get_one::<String>("contact").map(|s| s.to_string());
    let role = LoanRole::parse(sub.get_one::<String>("role").unwrap())?;
    let principal = parse_decimal(sub.get_one::<String>("principal").unwrap())?;
    let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
    let interest_type = InterestType::parse(sub.get_one::<String>("interest-type").unwrap())?;
    let start = match sub.get_one::<String>("start") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let due = parse_date(sub.get_one::<String>("due").unwrap())?;

    let (interest_amount, total_amount) =
        computed_interest(principal, rate, interest_type, start, due);
    let store = Store::new(conn, vault);
    let (loan, entry) = store.create_loan(
        owner,
        &NewLoan {
            person: person.clone(),
            contact,
            role,
            principal,
            interest_rate: rate,
            interest_amount,
            total_amount,
            interest_type,
            start_date: start,
            due_date: due,
        },
    )?;
    match role {
        LoanRole::Lent => println!(
            "Lent {} to {} (loan #{}, due {}, entry #{})",
            principal, person, loan.id, due, entry.id
        ),
        LoanRole::Borrowed => println!(
            "Borrowed {} from {} (loan #{}, due {}, entry #{})",
            principal, person, loan.id, due, entry.id
        ),
    }
    Ok(())
}

fn list(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let store = Store::new(conn, vault);
    let loans = store.loans(owner)?;
    if !maybe_print_json(json_flag, jsonl_flag, &loans)? {
        let rows: Vec<Vec<String>> = loans
            .iter()
            .map(|l| {
                vec![
                    l.id.to_string(),
                    l.person.clone(),
                    l.role.as_str().to_string(),
                    format!("{:.2}", l.principal),
                    format!("{:.2}", l.interest_amount),
                    format!("{:.2}", l.total_amount),
                    l.due_date.to_string(),
                    if l.settled { "settled" } else { "open" }.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Person", "Role", "Principal", "Interest", "Total", "Due", "Status"],
                rows,
            )
        );
    }
    Ok(())
}

fn settle(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let paid = parse_decimal(sub.get_one::<String>("paid").unwrap())?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let store = Store::new(conn, vault);
    match store.settle_loan(owner, id, paid, date)? {
        SettleOutcome::Settled { loan, entries } => {
            println!(
                "Settled loan #{} with {} ({} paid)",
                loan.id, loan.person, paid
            );
            for e in &entries {
                println!("  entry #{}: {} {} ({})", e.id, e.kind.as_str(), e.amount, e.category);
            }
        }
        SettleOutcome::AlreadySettled(loan) => {
            println!("Loan #{} is already settled; nothing to do", loan.id);
        }
    }
    Ok(())
}

fn edit(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let person = sub.get_one::<String>("person").map(|s| s.as_str());
    let contact = sub.get_one::<String>("contact").map(|s| s.as_str());
    let due = match sub.get_one::<String>("due") {
        Some(d) => Some(parse_date(d)?),
        None => None,
    };
    if person.is_none() && contact.is_none() && due.is_none() {
        println!("Nothing to change");
        return Ok(());
    }
    let store = Store::new(conn, vault);
    let loan = store.update_loan_meta(owner, id, person, contact, due)?;
    println!("Updated loan #{} ({})", loan.id, loan.person);
    Ok(())
}

fn rm(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = Store::new(conn, vault);
    store.delete_loan(owner, id)?;
    println!("Loan & linked entries deleted");
    Ok(())
}

/// Walks unsettled loans due within a week and moves each to the furthest
/// reminder stage reached.
fn due(conn: &Connection, vault: &FieldVault) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let store = Store::new(conn, vault);
    let now = today();
    let mut rows = Vec::new();
    for loan in store.loans(owner)? {
        if loan.settled {
            continue;
        }
        let days_left = (loan.due_date - now).num_days();
        let stage = if days_left <= 0 {
            ReminderStage::DueDate
        } else if days_left <= 3 {
            ReminderStage::ThreeDays
        } else if days_left <= 7 {
            ReminderStage::SevenDays
        } else {
            continue;
        };
        let updated = store.advance_reminder(owner, loan.id, stage)?;
        rows.push(vec![
            updated.id.to_string(),
            updated.person.clone(),
            updated.role.as_str().to_string(),
            format!("{:.2}", updated.total_amount),
            updated.due_date.to_string(),
            days_left.to_string(),
            updated.reminder_stage.as_str().to_string(),
        ]);
    }
    if rows.is_empty() {
        println!("No loans due within a week");
    } else {
        println!(
            "{}",
            pretty_table(
                &["ID", "Person", "Role", "Total", "Due", "Days left", "Stage"],
                rows,
            )
        );
    }
    Ok(())
}
