// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_base_currency, get_setting, pretty_table, set_base_currency, set_setting};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub const COMPANY_NAME: &str = "company_name";

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-currency", sub)) => {
            let ccy = sub.get_one::<String>("currency").unwrap().trim().to_uppercase();
            if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("currency must be a 3-letter code, got '{}'", ccy);
            }
            set_base_currency(conn, &ccy)?;
            println!("Base currency set to {}", ccy);
        }
        Some(("set-company", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            if name.is_empty() {
                bail!("company name must not be blank");
            }
            set_setting(conn, COMPANY_NAME, name)?;
            println!("Company name set to '{}'", name);
        }
        _ => {
            let rows = vec![
                vec!["Base currency".to_string(), get_base_currency(conn)?],
                vec![
                    "Company".to_string(),
                    get_setting(conn, COMPANY_NAME)?.unwrap_or_default(),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
    }
    Ok(())
}
