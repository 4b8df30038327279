// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::journal::print_entries;
use super::{date_or_today, list_query, opt_string, print_page, required_id};
use crate::documents;
use crate::journal;
use crate::models::{Expense, ExpenseDraft, ReferenceType};
use crate::repo::Repo;
use crate::utils::{account_names, fmt_money, id_for_account, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from(conn, sub)?;
            let e = documents::record(conn, &draft)?;
            println!("Recorded expense #{} ({} to {})", e.id, fmt_money(&e.amount), e.payee);
        }
        Some(("update", sub)) => {
            let draft = draft_from(conn, sub)?;
            let e = documents::amend(conn, required_id(sub), &draft)?;
            println!("Updated expense #{}", e.id);
        }
        Some(("show", sub)) => {
            let id = required_id(sub);
            let e = Repo::<Expense>::new(conn).get(id)?;
            println!("Expense #{} on {}: {} to {}", e.id, e.date, fmt_money(&e.amount), e.payee);
            let rows = journal::entries_for(conn, ReferenceType::Expense, id)?;
            print_entries(conn, &rows)?;
        }
        Some(("list", sub)) => {
            let names = account_names(conn)?;
            let page = Repo::<Expense>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Date", "Account", "Payee", "Amount", "Note"],
                &[4],
                |e| {
                    vec![
                        e.id.to_string(),
                        e.date.to_string(),
                        names.get(&e.account_id).cloned().unwrap_or_default(),
                        e.payee.clone(),
                        fmt_money(&e.amount),
                        e.note.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            documents::discard::<Expense>(conn, id)?;
            println!("Removed expense {}", id);
        }
        Some(("restore", sub)) => {
            let e = documents::reinstate::<Expense>(conn, required_id(sub))?;
            println!("Restored expense #{}", e.id);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            documents::purge::<Expense>(conn, id)?;
            println!("Purged expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<ExpenseDraft> {
    Ok(ExpenseDraft {
        date: date_or_today(sub)?,
        account_id: id_for_account(conn, sub.get_one::<String>("account").unwrap())?,
        payee: sub.get_one::<String>("payee").unwrap().trim().to_string(),
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        note: opt_string(sub, "note"),
    })
}
