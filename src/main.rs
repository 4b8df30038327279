// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use std::path::Path;

use tillbook::{cli, commands, db, utils};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();
    utils::init_tracing(matches.get_count("verbose"));

    let explicit = matches.get_one::<String>("db").map(Path::new);
    let mut conn = db::open_or_init(explicit)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(explicit)?.display());
        }
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("account", sub)) => commands::accounts::handle(&conn, sub)?,
        Some(("contact", sub)) => commands::contacts::handle(&conn, sub)?,
        Some(("product", sub)) => commands::products::handle(&conn, sub)?,
        Some(("sale", sub)) => commands::sales::handle(&mut conn, sub)?,
        Some(("purchase", sub)) => commands::purchases::handle(&mut conn, sub)?,
        Some(("expense", sub)) => commands::expenses::handle(&mut conn, sub)?,
        Some(("income", sub)) => commands::incomes::handle(&mut conn, sub)?,
        Some(("journal", sub)) => commands::journal::handle(&mut conn, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, sub)?,
        Some(("lead", sub)) => commands::leads::handle(&mut conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
