// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{list_query, print_page, required_id};
use crate::models::{Product, ProductDraft};
use crate::repo::Repo;
use crate::utils::{fmt_money, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let repo = Repo::<Product>::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let p = repo.create(&draft_from(sub)?)?;
            println!("Added product {} ({}) #{}", p.sku, p.name, p.id);
        }
        Some(("update", sub)) => {
            let p = repo.update(required_id(sub), &draft_from(sub)?)?;
            println!("Updated product {}", p.sku);
        }
        Some(("list", sub)) => {
            let page = repo.find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "SKU", "Name", "Price", "Unit cost", "Stock"],
                &[3, 4, 5],
                |p| {
                    vec![
                        p.id.to_string(),
                        p.sku.clone(),
                        p.name.clone(),
                        fmt_money(&p.unit_price),
                        fmt_money(&p.unit_cost),
                        p.stock_qty.normalize().to_string(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            repo.soft_delete(id)?;
            println!("Removed product {}", id);
        }
        Some(("restore", sub)) => {
            let p = repo.restore(required_id(sub))?;
            println!("Restored product {}", p.sku);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            repo.hard_delete(id)?;
            println!("Purged product {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(sub: &clap::ArgMatches) -> Result<ProductDraft> {
    Ok(ProductDraft {
        sku: sub.get_one::<String>("sku").unwrap().trim().to_string(),
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        unit_price: parse_decimal(sub.get_one::<String>("price").unwrap())?,
    })
}
