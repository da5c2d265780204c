// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{clear_active_profile, pretty_table, set_active_profile};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            conn.execute("INSERT INTO profiles(name) VALUES (?1)", params![name])?;
            // first profile becomes active without a separate 'use'
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_profile'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            if active.is_none() {
                set_active_profile(conn, &name)?;
                println!("Added profile '{}' (now active)", name);
            } else {
                println!("Added profile '{}'", name);
            }
        }
        Some(("list", _)) => {
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_profile'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let mut stmt = conn.prepare("SELECT name, created_at FROM profiles ORDER BY name")?;
            let rows = stmt.query_map([], |r| {
                Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (name, created) = row?;
                let marker = if active.as_deref() == Some(name.as_str()) {
                    "*"
                } else {
                    ""
                };
                data.push(vec![name, created, marker.to_string()]);
            }
            println!("{}", pretty_table(&["Name", "Created", "Active"], data));
        }
        Some(("use", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            set_active_profile(conn, name)?;
            println!("Active profile set to '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let active: Option<String> = conn
                .query_row(
                    "SELECT value FROM settings WHERE key='active_profile'",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let removed = conn.execute("DELETE FROM profiles WHERE name=?1", params![name])?;
            if removed == 0 {
                println!("No profile named '{}'", name);
                return Ok(());
            }
            if active.as_deref() == Some(name) {
                clear_active_profile(conn)?;
            }
            println!("Removed profile '{}' and everything it owned", name);
        }
        _ => {}
    }
    Ok(())
}
