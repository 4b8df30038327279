// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::{list_query, opt_string, print_page, required_id};
use crate::crm;
use crate::models::{Lead, LeadDraft, LeadStatus};
use crate::repo::Repo;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let lead = Repo::<Lead>::new(conn).create(&draft_from(sub)?)?;
            println!("Added lead '{}' #{}", lead.name, lead.id);
        }
        Some(("update", sub)) => {
            let lead = crm::update_lead(conn, required_id(sub), &draft_from(sub)?)?;
            println!("Updated lead '{}' ({})", lead.name, lead.status);
        }
        Some(("convert", sub)) => {
            let (lead, contact) = crm::convert_lead(conn, required_id(sub))?;
            println!(
                "Converted lead '{}' into customer #{}",
                lead.name, contact.id
            );
        }
        Some(("list", sub)) => {
            let page = Repo::<Lead>::new(conn).find_all(&list_query(sub))?;
            print_page(
                sub,
                &page,
                &["ID", "Name", "Company", "Email", "Status", "Contact"],
                &[],
                |l| {
                    vec![
                        l.id.to_string(),
                        l.name.clone(),
                        l.company.clone().unwrap_or_default(),
                        l.email.clone().unwrap_or_default(),
                        l.status.to_string(),
                        l.contact_id.map(|c| c.to_string()).unwrap_or_default(),
                    ]
                },
            )?;
        }
        Some(("rm", sub)) => {
            let id = required_id(sub);
            Repo::<Lead>::new(conn).soft_delete(id)?;
            println!("Removed lead {}", id);
        }
        Some(("restore", sub)) => {
            let lead = Repo::<Lead>::new(conn).restore(required_id(sub))?;
            println!("Restored lead '{}'", lead.name);
        }
        Some(("purge", sub)) => {
            let id = required_id(sub);
            Repo::<Lead>::new(conn).hard_delete(id)?;
            println!("Purged lead {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn draft_from(sub: &clap::ArgMatches) -> Result<LeadDraft> {
    Ok(LeadDraft {
        name: sub.get_one::<String>("name").unwrap().trim().to_string(),
        email: opt_string(sub, "email"),
        company: opt_string(sub, "company"),
        status: sub.get_one::<String>("status").unwrap().parse::<LeadStatus>()?,
    })
}
