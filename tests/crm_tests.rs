// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tillbook::crm;
use tillbook::db;
use tillbook::error::BookError;
use tillbook::models::{Contact, ContactKind, Lead, LeadDraft, LeadStatus};
use tillbook::repo::Repo;

fn lead(name: &str, status: LeadStatus) -> LeadDraft {
    LeadDraft {
        name: name.to_string(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        company: Some("Northwind".into()),
        status,
    }
}

#[test]
fn convert_creates_a_customer_and_links_it() {
    let mut conn = db::open_in_memory().unwrap();
    let l = Repo::<Lead>::new(&conn)
        .create(&lead("Dana", LeadStatus::Qualified))
        .unwrap();
    let (converted, contact) = crm::convert_lead(&mut conn, l.id).unwrap();
    assert_eq!(converted.status, LeadStatus::Converted);
    assert_eq!(converted.contact_id, Some(contact.id));
    assert!(converted.converted_at.is_some());
    assert_eq!(contact.kind, ContactKind::Customer);
    assert_eq!(contact.name, "Dana");
    assert_eq!(contact.email.as_deref(), Some("dana@example.com"));
}

#[test]
fn converting_twice_fails_without_a_second_contact() {
    let mut conn = db::open_in_memory().unwrap();
    let l = Repo::<Lead>::new(&conn)
        .create(&lead("Eli", LeadStatus::New))
        .unwrap();
    crm::convert_lead(&mut conn, l.id).unwrap();
    let err = crm::convert_lead(&mut conn, l.id).unwrap_err();
    assert!(matches!(err, BookError::AlreadyConverted));
    assert_eq!(err.to_string(), "Lead is already converted");
    let contacts: i64 = conn
        .query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(contacts, 1);
}

#[test]
fn lost_lead_cannot_be_converted() {
    let mut conn = db::open_in_memory().unwrap();
    let l = Repo::<Lead>::new(&conn)
        .create(&lead("Fay", LeadStatus::Lost))
        .unwrap();
    assert!(matches!(
        crm::convert_lead(&mut conn, l.id),
        Err(BookError::Validation(_))
    ));
    assert!(Repo::<Contact>::new(&conn)
        .find_all(&Default::default())
        .unwrap()
        .data
        .is_empty());
}

#[test]
fn converted_lead_is_read_only() {
    let mut conn = db::open_in_memory().unwrap();
    let l = Repo::<Lead>::new(&conn)
        .create(&lead("Gus", LeadStatus::Contacted))
        .unwrap();
    let updated = crm::update_lead(&conn, l.id, &lead("Gus", LeadStatus::Qualified)).unwrap();
    assert_eq!(updated.status, LeadStatus::Qualified);
    crm::convert_lead(&mut conn, l.id).unwrap();
    assert!(matches!(
        crm::update_lead(&conn, l.id, &lead("Gus", LeadStatus::New)),
        Err(BookError::AlreadyConverted)
    ));
}
