// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{list_query, opt_string, print_page, required_id};
use crate::models::{Contact, ContactDraft, ContactKind};
use crate::repo::Repo;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let repo = Repo::<Contact>::new(conn);
    match m.subcommand() {
        Some(("add", sub)) => {
            let c = repo.create(&draft_from(sub)?)?;
            println!("Added {} '{}' #{}", c.kind, c.name, c.id);
        }
        Some(("update", sub)) => {
            let c = repo.update(required_id(sub), &draft_from(sub)?)?;
            println!("Updated {} '{}'", c.kind, c.name);
        }
        Some(("list", sub)) => {
            let page = repo.find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Name", "Kind", "Email", "Phone"],
                &[],
                |c| {
                    vec![
                        c.id.to_string(),
                        c.name.clone(),
                        c.kind.to_string(),
                        c.email.clone().unwrap_or_default(),
                        c.phone.clone().unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            repo.soft_delete(id)?;
            println!("Removed contact {}", id);
        }
        Some(("restore", sub)) => {
            let c = repo.restore(required_id(sub))?;
            println!("Restored contact '{}'", c.name);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            repo.hard_delete(id)?;
            println!("Purged contact {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(sub: &clap::ArgMatches) -> Result<ContactDraft> {
    Ok(ContactDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        kind: sub.get_one::<String>("kind").unwrap().parse::<ContactKind>()?,
        email: opt_string(sub, "email"),
        phone: opt_string(sub, "phone"),
    })
}
