// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{date_or_today, list_query, opt_date, print_page, required_id};
use crate::journal::{self, EntryFilter, Leg, Side};
use crate::models::JournalEntry;
use crate::utils::{account_names, fmt_money, id_for_account, money_table, parse_decimal};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("post", sub)) => {
            let mut legs = Vec::new();
            for (key, side) in [("debit", Side::Debit), ("credit", Side::Credit)] {
                if let Some(vals) = sub.get_many::<String>(key) {
                    for v in vals {
                        legs.push(parse_leg(conn, v, side)?);
                    }
                }
            }
            let date = date_or_today(sub)?;
            let description = sub.get_one::<String>("description").unwrap();
            let reference_id = journal::post_manual(conn, date, description.trim(), &legs)?;
            println!("Posted manual entry {}", reference_id);
        }
        Some(("list", sub)) => {
            let account_id = match sub.get_one::<String>("account") {
                Some(name) => Some(id_for_account(conn, name)?),
                None => None,
            };
            let filter = EntryFilter {
                from: opt_date(sub, "from")?,
                to: opt_date(sub, "to")?,
                account_id,
                reference: None,
            };
            let names = account_names(conn)?;
            let page = journal::list_entries(conn, &list_query(sub), &filter)?;
            print_page(
                sub,
                &page,
                &["ID", "Date", "Ref", "Debit", "Credit", "Amount", "Description"],
                &[5],
                |e| entry_row(&names, e),
            )?;
        }
        Some(("void", sub)) => {
            let id = required_id(sub);
            let n = journal::void_manual(conn, id)?;
            println!("Voided manual entry {} ({} rows)", id, n);
        }
        _ => {}
    }
    Ok(())
}

/// `ACCOUNT=AMOUNT`, split on the last `=` so account names may contain one.
fn parse_leg(conn: &Connection, raw: &str, side: Side) -> Result<Leg> {
    let Some((name, amount)) = raw.rsplit_once('=') else {
        bail!("expected ACCOUNT=AMOUNT, got '{}'", raw);
    };
    let amount = parse_decimal(amount).with_context(|| format!("in '{}'", raw))?;
    Ok(Leg {
        account_id: id_for_account(conn, name)?,
        side,
        amount,
    })
}

fn entry_row(names: &std::collections::HashMap<i64, String>, e: &JournalEntry) -> Vec<String> {
    let name = |id: i64| names.get(&id).cloned().unwrap_or_else(|| format!("#{}", id));
    vec![
        e.id.to_string(),
        e.date.to_string(),
        format!("{} {}", e.reference_type, e.reference_id),
        name(e.debit_account_id),
        name(e.credit_account_id),
        fmt_money(&e.amount),
        e.description.clone(),
    ]
}

/// Prints journal rows as a table.
pub fn print_entries(conn: &Connection, entries: &[JournalEntry]) -> Result<()> {
    if entries.is_empty() {
        println!("(no journal rows)");
        return Ok(());
    }
    let names = account_names(conn)?;
    let rows = entries.iter().map(|e| entry_row(&names, e)).collect();
    println!(
        "{}",
        money_table(
            &["ID", "Date", "Ref", "Debit", "Credit", "Amount", "Description"],
            &[5],
            rows
        )
    );
    Ok(())
}
