// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

/// Key file for the field vault, kept next to the database.
pub fn key_path() -> Result<PathBuf> {
    Ok(db_path()?.with_file_name("tallybook.key"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS profiles(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    -- person, contact, principal, rates, amounts are vault-encoded TEXT
    CREATE TABLE IF NOT EXISTS loans(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        profile_id INTEGER NOT NULL,
        person TEXT NOT NULL,
        contact TEXT,
        role TEXT NOT NULL CHECK(role IN ('lent','borrowed')),
        principal TEXT NOT NULL,
        interest_rate TEXT NOT NULL,
        interest_amount TEXT NOT NULL,
        total_amount TEXT NOT NULL,
        interest_type TEXT NOT NULL CHECK(interest_type IN ('simple','monthly')),
        start_date TEXT NOT NULL,
        due_date TEXT NOT NULL,
        settled INTEGER NOT NULL DEFAULT 0,
        reminder_stage TEXT NOT NULL DEFAULT 'none'
            CHECK(reminder_stage IN ('none','7days','3days','duedate')),
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_loans_profile ON loans(profile_id);

    -- amount, category, note are vault-encoded TEXT
    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        profile_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense','investment')),
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        method TEXT NOT NULL,
        is_principal INTEGER NOT NULL DEFAULT 0,
        loan_id INTEGER,
        note TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(profile_id) REFERENCES profiles(id) ON DELETE CASCADE,
        FOREIGN KEY(loan_id) REFERENCES loans(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);
    CREATE INDEX IF NOT EXISTS idx_transactions_profile ON transactions(profile_id);
    CREATE INDEX IF NOT EXISTS idx_transactions_loan ON transactions(loan_id);
    "#,
    )?;
    Ok(())
}
