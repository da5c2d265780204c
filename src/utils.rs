// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_month(s: &str) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok(s.to_string())
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn id_for_profile(conn: &Connection, name: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM profiles WHERE name=?1")?;
    let id: i64 = stmt
        .query_row(params![name], |r| r.get(0))
        .with_context(|| format!("Profile '{}' not found", name))?;
    Ok(id)
}

/// The profile every command acts as. Set with `tallybook profile use`.
pub fn active_profile(conn: &Connection) -> Result<(i64, String)> {
    let name: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key='active_profile'",
            [],
            |r| r.get(0),
        )
        .optional()?;
    let name = name.context(
        "No active profile. Create one with 'tallybook profile add <name>' \
         and select it with 'tallybook profile use <name>'",
    )?;
    let id = id_for_profile(conn, &name)?;
    Ok((id, name))
}

pub fn set_active_profile(conn: &Connection, name: &str) -> Result<()> {
    id_for_profile(conn, name)?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES('active_profile', ?1)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![name],
    )?;
    Ok(())
}

pub fn clear_active_profile(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key='active_profile'", [])?;
    Ok(())
}

// Display conversion is a render-time multiply only; nothing here ever
// writes back into an amount.
pub fn display_rate(conn: &Connection, ccy: &str) -> Result<Option<Decimal>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![format!("display_rate_{}", ccy.to_uppercase())],
            |r| r.get(0),
        )
        .optional()?;
    match v {
        Some(s) => Ok(Some(parse_decimal(&s)?)),
        None => Ok(None),
    }
}

pub fn set_display_rate(conn: &Connection, ccy: &str, rate: Decimal) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![format!("display_rate_{}", ccy.to_uppercase()), rate.to_string()],
    )?;
    Ok(())
}
