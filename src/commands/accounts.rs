// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{list_query, print_page, required_id};
use crate::journal;
use crate::models::{Account, AccountDraft, AccountType};
use crate::repo::Repo;
use crate::utils::get_base_currency;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from(conn, sub)?;
            let a = journal::create_account(conn, &draft)?;
            println!("Added account '{}' ({}, {}) #{}", a.name, a.r#type, a.currency, a.id);
        }
        Some(("update", sub)) => {
            let id = required_id(sub);
            let draft = draft_from(conn, sub)?;
            let a = journal::update_account(conn, id, &draft)?;
            println!("Updated account '{}'", a.name);
        }
        Some(("list", sub)) => {
            let page = Repo::<Account>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Name", "Type", "Currency", "Flags", "Created"],
                &[],
                |a| {
                    let mut flags = Vec::new();
                    if a.system {
                        flags.push("system");
                    }
                    if a.cash {
                        flags.push("cash");
                    }
                    if !a.active {
                        flags.push("inactive");
                    }
                    if a.deleted_at.is_some() {
                        flags.push("deleted");
                    }
                    vec![
                        a.id.to_string(),
                        a.name.clone(),
                        a.r#type.to_string(),
                        a.currency.clone(),
                        flags.join(","),
                        a.created_at.clone(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            journal::delete_account(conn, id)?;
            println!("Removed account {}", id);
        }
        Some(("restore", sub)) => {
            let a = Repo::<Account>::new(conn).restore(required_id(sub))?;
            println!("Restored account '{}'", a.name);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            journal::purge_account(conn, id)?;
            println!("Purged account {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<AccountDraft> {
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.trim().to_uppercase(),
        None => get_base_currency(conn)?,
    };
    Ok(AccountDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        r#type: sub.get_one::<String>("type").unwrap().parse::<AccountType>()?,
        currency,
        active: !sub.get_flag("inactive"),
        cash: sub.get_flag("cash"),
    })
}
