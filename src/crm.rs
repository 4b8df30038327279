// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BookError, Result};
use crate::models::{Contact, ContactDraft, ContactKind, Lead, LeadDraft, LeadStatus};
use crate::repo::Repo;
use rusqlite::{Connection, params};
use tracing::info;

pub fn update_lead(conn: &Connection, id: i64, draft: &LeadDraft) -> Result<Lead> {
    let repo = Repo::<Lead>::new(conn);
    if repo.get(id)?.status == LeadStatus::Converted {
        return Err(BookError::AlreadyConverted);
    }
    repo.update(id, draft)
}

/// Turns a lead into a customer contact.
pub fn convert_lead(conn: &mut Connection, id: i64) -> Result<(Lead, Contact)> {
    let tx = conn.transaction()?;
    let leads = Repo::<Lead>::new(&tx);
    let lead = leads.get(id)?;
    match lead.status {
        LeadStatus::Converted => return Err(BookError::AlreadyConverted),
        LeadStatus::Lost => {
            return Err(BookError::Validation(format!(
                "lead '{}' is lost and cannot be converted",
                lead.name
            )));
        }
        _ => {}
    }
    let contact = Repo::<Contact>::new(&tx).create(&ContactDraft {
        name: lead.name.clone(),
        kind: ContactKind::Customer,
        email: lead.email.clone(),
        phone: None,
    })?;
    tx.execute(
        "UPDATE leads SET status='converted', contact_id=?1, converted_at=datetime('now'), updated_at=datetime('now') WHERE id=?2",
        params![contact.id, id],
    )?;
    let lead = leads.get(id)?;
    tx.commit()?;
    info!(lead = id, contact = contact.id, "lead converted");
    Ok((lead, contact))
}
