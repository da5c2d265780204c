// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EntryOrigin, NewTransaction, TxnKind};
use crate::store::{DeleteOutcome, Store};
use crate::utils::{active_profile, maybe_print_json, parse_date, parse_decimal, pretty_table, today};
use crate::vault::FieldVault;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, vault: &FieldVault, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, vault, sub)?,
        Some(("list", sub)) => list(conn, vault, sub)?,
        Some(("rm", sub)) => rm(conn, vault, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let kind = TxnKind::parse(sub.get_one::<String>("kind").unwrap())?;
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let method = sub.get_one::<String>("method").unwrap().trim().to_string();
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "General".to_string());
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => today(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let store = Store::new(conn, vault);
    let id = store.insert_transaction(
        owner,
        &NewTransaction {
            date,
            kind,
            amount,
            category: category.clone(),
            method,
            is_principal: false,
            loan_id: None,
            note,
        },
    )?;
    println!(
        "Recorded {} of {} on {} ({}) [#{}]",
        kind.as_str(),
        amount,
        date,
        category,
        id
    );
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub method: String,
    pub origin: String,
    pub note: String,
}

/// Filters run over the decoded snapshot; category and amount are opaque to
/// SQL.
pub fn query_rows(
    store: &Store,
    owner: i64,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let month = sub.get_one::<String>("month");
    let kind = match sub.get_one::<String>("kind") {
        Some(k) => Some(TxnKind::parse(k)?),
        None => None,
    };
    let method = sub.get_one::<String>("method").map(|s| s.to_lowercase());
    let limit = sub.get_one::<usize>("limit").copied();

    let mut data = Vec::new();
    for t in store.transactions(owner)? {
        if let Some(m) = month {
            if &t.date.format("%Y-%m").to_string() != m {
                continue;
            }
        }
        if let Some(k) = kind {
            if t.kind != k {
                continue;
            }
        }
        if let Some(ref m) = method {
            if &t.method.to_lowercase() != m {
                continue;
            }
        }
        let origin = match t.origin() {
            EntryOrigin::Manual => String::new(),
            EntryOrigin::LoanPrincipal(id) => format!("principal (loan #{})", id),
            EntryOrigin::LoanInterest(id) => format!("interest (loan #{})", id),
        };
        data.push(TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.as_str().to_string(),
            amount: t.amount.to_string(),
            category: t.category,
            method: t.method,
            origin,
            note: t.note.unwrap_or_default(),
        });
        if let Some(l) = limit {
            if data.len() == l {
                break;
            }
        }
    }
    Ok(data)
}

fn list(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let store = Store::new(conn, vault);
    let data = query_rows(&store, owner, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.method.clone(),
                    r.origin.clone(),
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Kind", "Amount", "Category", "Method", "Origin", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let store = Store::new(conn, vault);
    match store.delete_transaction(owner, id)? {
        DeleteOutcome::Transaction => println!("Transaction deleted"),
        DeleteOutcome::TransactionAndLoan => println!("Transaction & related loan deleted"),
    }
    Ok(())
}
