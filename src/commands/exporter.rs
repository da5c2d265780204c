// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::active_profile;
use crate::vault::FieldVault;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, vault: &FieldVault, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, vault, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, vault: &FieldVault, sub: &clap::ArgMatches) -> Result<()> {
    let (owner, _) = active_profile(conn)?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let store = Store::new(conn, vault);
    let mut txns = store.transactions(owner)?;
    txns.sort_by(|a, b| (a.date, a.id).cmp(&(b.date, b.id)));

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date", "kind", "amount", "category", "method", "principal", "loan", "note",
            ])?;
            for t in &txns {
                wtr.write_record([
                    t.date.to_string(),
                    t.kind.as_str().to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.method.clone(),
                    t.is_principal.to_string(),
                    t.loan_id.map(|id| id.to_string()).unwrap_or_default(),
                    t.note.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for t in &txns {
                items.push(json!({
                    "date": t.date.to_string(),
                    "kind": t.kind.as_str(),
                    "amount": t.amount.to_string(),
                    "category": t.category,
                    "method": t.method,
                    "principal": t.is_principal,
                    "loan": t.loan_id,
                    "note": t.note,
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    println!("Exported {} transactions to {}", txns.len(), out);
    Ok(())
}
