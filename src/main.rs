// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::{cli, commands, db, vault::FieldVault};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let conn = db::open_or_init()?;
    let vault = FieldVault::load_or_create(&db::key_path()?)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("profile", sub)) => commands::profiles::handle(&conn, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&conn, &vault, sub)?,
        Some(("loan", sub)) => commands::loans::handle(&conn, &vault, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &vault, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, &vault, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &vault)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
