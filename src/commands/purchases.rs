// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::journal::print_entries;
use super::{date_or_today, list_query, opt_string, print_page, required_id};
use crate::documents;
use crate::journal;
use crate::models::{Purchase, PurchaseDraft, ReferenceType};
use crate::repo::Repo;
use crate::utils::{fmt_money, id_for_product, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from(conn, sub)?;
            let p = documents::record(conn, &draft)?;
            println!("Recorded purchase #{} for {}", p.id, fmt_money(&p.amount));
        }
        Some(("update", sub)) => {
            let draft = draft_from(conn, sub)?;
            let p = documents::amend(conn, required_id(sub), &draft)?;
            println!("Updated purchase #{}", p.id);
        }
        Some(("show", sub)) => {
            let id = required_id(sub);
            let p = Repo::<Purchase>::new(conn).get(id)?;
            let rows = journal::entries_for(conn, ReferenceType::Purchase, id)?;
            println!(
                "Purchase #{} on {}: {} ({}), qty {}, unit cost {}",
                p.id,
                p.date,
                fmt_money(&p.amount),
                if p.paid { "paid" } else { "on credit" },
                p.quantity.normalize(),
                fmt_money(&p.unit_cost())
            );
            print_entries(conn, &rows)?;
        }
        Some(("list", sub)) => {
            let page = Repo::<Purchase>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Date", "Supplier", "Product", "Qty", "Amount", "Paid", "Note"],
                &[4, 5],
                |p| {
                    vec![
                        p.id.to_string(),
                        p.date.to_string(),
                        p.contact_id.map(|c| c.to_string()).unwrap_or_default(),
                        p.product_id.map(|x| x.to_string()).unwrap_or_default(),
                        p.quantity.normalize().to_string(),
                        fmt_money(&p.amount),
                        if p.paid { "yes" } else { "no" }.to_string(),
                        p.note.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            documents::discard::<Purchase>(conn, id)?;
            println!("Removed purchase {}", id);
        }
        Some(("restore", sub)) => {
            let p = documents::reinstate::<Purchase>(conn, required_id(sub))?;
            println!("Restored purchase #{}", p.id);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            documents::purge::<Purchase>(conn, id)?;
            println!("Purged purchase {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<PurchaseDraft> {
    let product_id = match sub.get_one::<String>("product") {
        Some(sku) => Some(id_for_product(conn, sku)?),
        None => None,
    };
    Ok(PurchaseDraft {
        date: date_or_today(sub)?,
        contact_id: sub.get_one::<i64>("supplier").copied(),
        product_id,
        quantity: parse_decimal(sub.get_one::<String>("quantity").unwrap())?,
        amount: parse_decimal(sub.get_one::<String>("amount").unwrap())?,
        paid: !sub.get_flag("credit"),
        note: opt_string(sub, "note"),
    })
}
