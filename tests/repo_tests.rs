// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use tillbook::db;
use tillbook::error::BookError;
use tillbook::models::{Contact, ContactDraft, ContactKind, Product, ProductDraft};
use tillbook::repo::{ListQuery, Repo, Scope, SortOrder};

fn contact(name: &str, kind: ContactKind) -> ContactDraft {
    ContactDraft {
        name: name.to_string(),
        kind,
        email: None,
        phone: None,
    }
}

#[test]
fn pagination_reports_totals_and_pages() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    for i in 1..=5 {
        repo.create(&contact(&format!("C{}", i), ContactKind::Customer))
            .unwrap();
    }
    let page = repo.find_all(&ListQuery::default().paged(2, 2)).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.page, 2);
    assert_eq!(page.data.len(), 2);
    // newest first, ties broken by id
    assert_eq!(page.data[0].name, "C3");
    assert_eq!(page.data[1].name, "C2");

    let last = repo.find_all(&ListQuery::default().paged(3, 2)).unwrap();
    assert_eq!(last.data.len(), 1);
    assert_eq!(last.data[0].name, "C1");
}

#[test]
fn empty_table_has_zero_pages() {
    let conn = db::open_in_memory().unwrap();
    let page = Repo::<Contact>::new(&conn)
        .find_all(&ListQuery::default())
        .unwrap();
    assert_eq!(page.total, 0);
    assert_eq!(page.total_pages, 0);
    assert!(page.data.is_empty());
}

#[test]
fn zero_page_or_limit_is_rejected() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    let err = repo.find_all(&ListQuery::default().paged(0, 10)).unwrap_err();
    assert!(matches!(err, BookError::Validation(_)));
    let err = repo.find_all(&ListQuery::default().paged(1, 0)).unwrap_err();
    assert!(matches!(err, BookError::Validation(_)));
}

#[test]
fn search_is_case_insensitive_and_escapes_wildcards() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    repo.create(&ContactDraft {
        email: Some("ALICE@example.com".into()),
        ..contact("Alice Co", ContactKind::Customer)
    })
    .unwrap();
    repo.create(&contact("Bob 100% Ltd", ContactKind::Supplier))
        .unwrap();
    repo.create(&contact("Bob 1000 Ltd", ContactKind::Supplier))
        .unwrap();

    let hits = repo
        .find_all(&ListQuery::default().with_search("alice@"))
        .unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.data[0].name, "Alice Co");

    let hits = repo
        .find_all(&ListQuery::default().with_search("100%"))
        .unwrap();
    assert_eq!(hits.total, 1);
    assert_eq!(hits.data[0].name, "Bob 100% Ltd");
}

#[test]
fn sort_field_must_be_whitelisted() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    repo.create(&contact("Zed", ContactKind::Customer)).unwrap();
    repo.create(&contact("Amy", ContactKind::Customer)).unwrap();

    let q = ListQuery {
        sort: Some("name".into()),
        order: SortOrder::Asc,
        ..ListQuery::default()
    };
    let page = repo.find_all(&q).unwrap();
    assert_eq!(page.data[0].name, "Amy");

    let q = ListQuery {
        sort: Some("name; DROP TABLE contacts".into()),
        ..ListQuery::default()
    };
    assert!(matches!(repo.find_all(&q), Err(BookError::Validation(_))));
}

#[test]
fn soft_delete_hides_and_restore_brings_back() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    let c = repo.create(&contact("Gone", ContactKind::Customer)).unwrap();
    repo.soft_delete(c.id).unwrap();

    assert!(matches!(repo.get(c.id), Err(BookError::NotFound { .. })));
    assert!(repo.find(c.id).unwrap().unwrap().deleted_at.is_some());
    assert_eq!(repo.find_all(&ListQuery::default()).unwrap().total, 0);
    let deleted = repo
        .find_all(&ListQuery::default().scoped(Scope::Deleted))
        .unwrap();
    assert_eq!(deleted.total, 1);

    // deleting twice is a not-found
    assert!(matches!(
        repo.soft_delete(c.id),
        Err(BookError::NotFound { .. })
    ));

    let back = repo.restore(c.id).unwrap();
    assert!(back.deleted_at.is_none());
    assert_eq!(repo.find_all(&ListQuery::default()).unwrap().total, 1);
}

#[test]
fn hard_delete_removes_the_row() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    let c = repo.create(&contact("Temp", ContactKind::Supplier)).unwrap();
    repo.hard_delete(c.id).unwrap();
    assert!(repo.find(c.id).unwrap().is_none());
    assert!(matches!(
        repo.hard_delete(c.id),
        Err(BookError::NotFound { .. })
    ));
}

#[test]
fn duplicate_sku_is_a_conflict() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Product>::new(&conn);
    let draft = ProductDraft {
        sku: "W-1".into(),
        name: "Widget".into(),
        unit_price: Decimal::new(500, 2),
    };
    repo.create(&draft).unwrap();
    assert!(matches!(repo.create(&draft), Err(BookError::Conflict(_))));
}

#[test]
fn update_sets_fields_and_missing_id_is_not_found() {
    let conn = db::open_in_memory().unwrap();
    let repo = Repo::<Contact>::new(&conn);
    let c = repo.create(&contact("Old", ContactKind::Customer)).unwrap();
    let updated = repo
        .update(
            c.id,
            &ContactDraft {
                phone: Some("555-0100".into()),
                ..contact("New", ContactKind::Customer)
            },
        )
        .unwrap();
    assert_eq!(updated.name, "New");
    assert_eq!(updated.phone.as_deref(), Some("555-0100"));
    assert!(matches!(
        repo.update(999, &contact("X", ContactKind::Customer)),
        Err(BookError::NotFound { .. })
    ));
}
