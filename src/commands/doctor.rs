// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use crate::vault::FieldVault;
use anyhow::Result;
use rusqlite::Connection;

/// Read-only integrity scan over the loan/entry invariants.
pub fn handle(conn: &Connection, vault: &FieldVault) -> Result<()> {
    let mut rows = Vec::new();

    // 1) Loan-linked entries whose loan row is gone (the FK cascade should
    //    make this impossible)
    let mut stmt = conn.prepare(
        "SELECT t.id FROM transactions t LEFT JOIN loans l ON t.loan_id=l.id
         WHERE t.loan_id IS NOT NULL AND l.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["orphan_loan_entry".into(), format!("transaction #{}", id)]);
    }

    // 2) Unsettled loans with no principal-movement entry
    let mut stmt2 = conn.prepare(
        "SELECT l.id FROM loans l WHERE l.settled=0 AND NOT EXISTS
           (SELECT 1 FROM transactions t WHERE t.loan_id=l.id AND t.is_principal=1)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        rows.push(vec!["loan_missing_principal_entry".into(), format!("loan #{}", id)]);
    }

    // 3) Loan-linked entries carrying a cash-rail method
    let mut stmt3 = conn.prepare(
        "SELECT id, method FROM transactions
         WHERE loan_id IS NOT NULL AND lower(method) NOT IN ('loan','borrow')",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        let method: String = r.get(1)?;
        rows.push(vec![
            "loan_entry_bad_method".into(),
            format!("transaction #{} ({})", id, method),
        ]);
    }

    // 4) Confidential values the vault can no longer open
    let mut stmt4 =
        conn.prepare("SELECT id, amount, category, note FROM transactions ORDER BY id")?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let amount: String = r.get(1)?;
        let category: String = r.get(2)?;
        let note: Option<String> = r.get(3)?;
        let mut bad = Vec::new();
        if !vault.can_decrypt(&amount) {
            bad.push("amount");
        }
        if !vault.can_decrypt(&category) {
            bad.push("category");
        }
        if let Some(n) = &note {
            if !vault.can_decrypt(n) {
                bad.push("note");
            }
        }
        if !bad.is_empty() {
            rows.push(vec![
                "undecryptable_field".into(),
                format!("transaction #{} ({})", id, bad.join(", ")),
            ]);
        }
    }
    let mut stmt5 = conn.prepare(
        "SELECT id, person, principal, interest_amount, total_amount FROM loans ORDER BY id",
    )?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        let fields: [(&str, String); 4] = [
            ("person", r.get(1)?),
            ("principal", r.get(2)?),
            ("interest_amount", r.get(3)?),
            ("total_amount", r.get(4)?),
        ];
        let bad: Vec<&str> = fields
            .iter()
            .filter(|(_, v)| !vault.can_decrypt(v))
            .map(|(n, _)| *n)
            .collect();
        if !bad.is_empty() {
            rows.push(vec![
                "undecryptable_field".into(),
                format!("loan #{} ({})", id, bad.join(", ")),
            ]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
