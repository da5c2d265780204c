// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, Summary};
use crate::models::TxnKind;
use crate::store::Store;
use crate::utils::{
    active_profile, display_rate, maybe_print_json, parse_decimal, parse_month, pretty_table,
    set_display_rate, today,
};
use crate::vault::FieldVault;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, vault: &FieldVault, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, vault, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, vault, sub)?,
        Some(("methods", sub)) => methods(conn, vault, sub)?,
        Some(("set-rate", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().to_uppercase();
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            set_display_rate(conn, &ccy, rate)?;
            println!("Display rate set: 1 base = {} {}", rate, ccy);
        }
        _ => {}
    }
    Ok(())
}

fn anchor_from(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("month") {
        Some(m) => {
            let month = parse_month(m)?;
            crate::utils::parse_date(&format!("{}-01", month))
        }
        None => Ok(today()),
    }
}

/// Render-time multiply only; the snapshot itself is never rescaled in
/// storage.
fn scaled(s: &Summary, rate: Decimal) -> Summary {
    let mut out = s.clone();
    out.monthly_income *= rate;
    out.monthly_expense *= rate;
    out.monthly_investment *= rate;
    out.total_balance *= rate;
    out.total_lent *= rate;
    out.total_borrowed *= rate;
    for v in out.method_balances.values_mut() {
        *v *= rate;
    }
    out
}

fn summary(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let anchor = anchor_from(sub)?;

    let store = Store::new(conn, vault);
    let txns = store.transactions(owner)?;
    let loans = store.loans(owner)?;
    let mut s = ledger::summarize(&txns, &loans, anchor);

    let mut unit = String::new();
    if let Some(ccy) = sub.get_one::<String>("currency") {
        let ccy = ccy.to_uppercase();
        let rate = display_rate(conn, &ccy)?
            .with_context(|| format!("No display rate for {} (set one with 'tallybook report set-rate {} <rate>')", ccy, ccy))?;
        s = scaled(&s, rate);
        unit = format!(" ({})", ccy);
    }

    if maybe_print_json(json_flag, jsonl_flag, &s)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &[&format!("{} P&L", s.month), &format!("Amount{}", unit)],
            vec![
                vec!["Income".into(), format!("{:.2}", s.monthly_income)],
                vec!["Expense".into(), format!("{:.2}", s.monthly_expense)],
                vec!["Investment".into(), format!("{:.2}", s.monthly_investment)],
            ],
        )
    );

    let mut rows: Vec<Vec<String>> = s
        .method_balances
        .iter()
        .map(|(m, b)| vec![m.clone(), format!("{:.2}", b)])
        .collect();
    rows.push(vec!["TOTAL".into(), format!("{:.2}", s.total_balance)]);
    println!(
        "{}",
        pretty_table(&["Method", &format!("Balance{}", unit)], rows)
    );

    println!(
        "Outstanding: lent {:.2}, borrowed {:.2}{}",
        s.total_lent, s.total_borrowed, unit
    );
    Ok(())
}

fn cashflow(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let store = Store::new(conn, vault);
    // principal movements are balance transfers, consistent with the monthly P&L
    let mut map: BTreeMap<String, (Decimal, Decimal, Decimal)> = BTreeMap::new();
    for t in store.transactions(owner)? {
        if t.is_principal {
            continue;
        }
        let key = format!("{:04}-{:02}", t.date.year(), t.date.month());
        let entry = map
            .entry(key)
            .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            TxnKind::Income => entry.0 += t.amount,
            TxnKind::Expense => entry.1 += t.amount,
            TxnKind::Investment => entry.2 += t.amount,
        }
    }
    let mut data = Vec::new();
    for (m, (inc, exp, inv)) in map.iter().rev().take(months) {
        data.push(vec![
            m.clone(),
            format!("{:.2}", inc),
            format!("{:.2}", exp),
            format!("{:.2}", inv),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Investment"], data)
        );
    }
    Ok(())
}

fn methods(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    let store = Store::new(conn, vault);
    let txns = store.transactions(owner)?;
    let s = ledger::summarize(&txns, &[], today());

    if maybe_print_json(json_flag, jsonl_flag, &s.method_balances)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = s
        .method_balances
        .iter()
        .map(|(m, b)| vec![m.clone(), format!("{:.2}", b)])
        .collect();
    rows.push(vec!["TOTAL".into(), format!("{:.2}", s.total_balance)]);
    println!("{}", pretty_table(&["Method", "Balance"], rows));
    Ok(())
}
