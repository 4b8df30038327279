// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::journal::print_entries;
use super::{date_or_today, list_query, opt_string, print_page, required_id};
use crate::documents;
use crate::journal;
use crate::models::{Income, IncomeDraft, ReferenceType};
use crate::repo::Repo;
use crate::utils::{account_names, fmt_money, id_for_account, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from(conn, sub)?;
            let i = documents::record(conn, &draft)?;
            println!("Recorded income #{} ({} from {})", i.id, fmt_money(&i.amount), i.source);
        }
        Some(("update", sub)) => {
            let draft = draft_from(conn, sub)?;
            let i = documents::amend(conn, required_id(sub), &draft)?;
            println!("Updated income #{}", i.id);
        }
        Some(("show", sub)) => {
            let id = required_id(sub);
            let i = Repo::<Income>::new(conn).get(id)?;
            println!("Income #{} on {}: {} from {}", i.id, i.date, fmt_money(&i.amount), i.source);
            let rows = journal::entries_for(conn, ReferenceType::Income, id)?;
            print_entries(conn, &rows)?;
        }
        Some(("list", sub)) => {
            let names = account_names(conn)?;
            let page = Repo::<Income>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Date", "Account", "Source", "Amount", "Note"],
                &[4],
                |i| {
                    vec![
                        i.id.to_string(),
                        i.date.to_string(),
                        names.get(&i.account_id).cloned().unwrap_or_default(),
                        i.source.clone(),
                        fmt_money(&i.amount),
                        i.note.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            documents::discard::<Income>(conn, id)?;
            println!("Removed income {}", id);
        }
        Some(("restore", sub)) => {
            let i = documents::reinstate::<Income>(conn, required_id(sub))?;
            println!("Restored income #{}", i.id);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            documents::purge::<Income>(conn, id)?;
            println!("Purged income {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<IncomeDraft> {
    Ok(IncomeDraft {
        date: date_or_today(sub)?,
        account_id: id_for_account(conn, sub.get_one::<String>("account").unwrap())?,
        source: sub.get_one::<String>("source").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        note: opt_string(sub, "note"),
    })
}
