// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::journal::print_entries;
use super::{date_or_today, list_query, opt_string, print_page, required_id};
use crate::documents;
use crate::journal;
use crate::models::{Product, ReferenceType, Sale, SaleDraft};
use crate::repo::Repo;
use crate::utils::{fmt_money, id_for_product, parse_decimal};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let draft = draft_from(conn, sub)?;
            let s = documents::record(conn, &draft)?;
            println!("Recorded sale #{} for {}", s.id, fmt_money(&s.amount));
        }
        Some(("update", sub)) => {
            let draft = draft_from(conn, sub)?;
            let s = documents::amend(conn, required_id(sub), &draft)?;
            println!("Updated sale #{}", s.id);
        }
        Some(("show", sub)) => {
            let id = required_id(sub);
            let sale = Repo::<Sale>::new(conn).get(id)?;
            let rows = journal::entries_for(conn, ReferenceType::Sale, id)?;
            println!(
                "Sale #{} on {}: {} ({}), qty {}, unit cost {}",
                sale.id,
                sale.date,
                fmt_money(&sale.amount),
                if sale.paid { "paid" } else { "on credit" },
                sale.quantity.normalize(),
                sale.unit_cost.map(|c| fmt_money(&c)).unwrap_or_else(|| "-".into())
            );
            print_entries(conn, &rows)?;
        }
        Some(("list", sub)) => {
            let page = Repo::<Sale>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Date", "Customer", "Product", "Qty", "Amount", "Paid", "Note"],
                &[4, 5],
                |s| {
                    vec![
                        s.id.to_string(),
                        s.date.to_string(),
                        s.contact_id.map(|c| c.to_string()).unwrap_or_default(),
                        s.product_id.map(|p| p.to_string()).unwrap_or_default(),
                        s.quantity.normalize().to_string(),
                        fmt_money(&s.amount),
                        if s.paid { "yes" } else { "no" }.to_string(),
                        s.note.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            documents::discard::<Sale>(conn, id)?;
            println!("Removed sale {}", id);
        }
        Some(("restore", sub)) => {
            let s = documents::reinstate::<Sale>(conn, required_id(sub))?;
            println!("Restored sale #{}", s.id);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            documents::purge::<Sale>(conn, id)?;
            println!("Purged sale {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(conn: &Connection, sub: &clap::ArgMatches) -> Result<SaleDraft> {
    let quantity = parse_decimal(sub.get_one::<String>("quantity").unwrap())?;
    let product_id = match sub.get_one::<String>("product") {
        Some(sku) => Some(id_for_product(conn, sku)?),
        None => None,
    };
    let amount = match (sub.get_one::<String>("amount"), product_id) {
        (Some(a), _) => parse_decimal(a)?,
        (None, Some(pid)) => Repo::<Product>::new(conn)
            .get(pid)?
            .unit_price
            .checked_mul(quantity)
            .context("amount is out of range")?,
        (None, None) => anyhow::bail!("--amount is required when no product is given"),
    };
    Ok(SaleDraft {
        date: date_or_today(sub)?,
        contact_id: sub.get_one::<i64>("customer").copied(),
        product_id,
        quantity,
        amount,
        paid: !sub.get_flag("credit"),
        note: opt_string(sub, "note"),
    })
}

