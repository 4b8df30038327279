// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rusqlite::Connection;
use tillbook::db;
use tillbook::documents;
use tillbook::error::BookError;
use tillbook::journal::{self, chart, system_account_id};
use tillbook::models::{
    Contact, ContactDraft, ContactKind, ExpenseDraft, Income, IncomeDraft, Product, ProductDraft,
    Purchase, PurchaseDraft, ReferenceType, Sale, SaleDraft,
};
use tillbook::repo::Repo;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

struct Fixture {
    conn: Connection,
    widget: i64,
    customer: i64,
    supplier: i64,
}

fn setup() -> Fixture {
    let conn = db::open_in_memory().unwrap();
    let widget = Repo::<Product>::new(&conn)
        .create(&ProductDraft {
            sku: "W-1".into(),
            name: "Widget".into(),
            unit_price: dec("25"),
        })
        .unwrap()
        .id;
    let contacts = Repo::<Contact>::new(&conn);
    let customer = contacts
        .create(&ContactDraft {
            name: "Acme".into(),
            kind: ContactKind::Customer,
            email: None,
            phone: None,
        })
        .unwrap()
        .id;
    let supplier = contacts
        .create(&ContactDraft {
            name: "Parts Inc".into(),
            kind: ContactKind::Supplier,
            email: None,
            phone: None,
        })
        .unwrap()
        .id;
    Fixture {
        conn,
        widget,
        customer,
        supplier,
    }
}

fn buy(f: &mut Fixture, qty: &str, amount: &str) -> Purchase {
    documents::record(
        &mut f.conn,
        &PurchaseDraft {
            date: d("2025-01-05"),
            contact_id: Some(f.supplier),
            product_id: Some(f.widget),
            quantity: dec(qty),
            amount: dec(amount),
            paid: true,
            note: None,
        },
    )
    .unwrap()
}

fn sale_draft(f: &Fixture, qty: &str, amount: &str) -> SaleDraft {
    SaleDraft {
        date: d("2025-01-10"),
        contact_id: Some(f.customer),
        product_id: Some(f.widget),
        quantity: dec(qty),
        amount: dec(amount),
        paid: true,
        note: Some("counter sale".into()),
    }
}

fn product(f: &Fixture) -> Product {
    Repo::<Product>::new(&f.conn).get(f.widget).unwrap()
}

fn account_balance(conn: &Connection, name: &str) -> Decimal {
    let id = system_account_id(conn, name).unwrap();
    let mut bal = Decimal::ZERO;
    for e in journal::entries(conn, &Default::default()).unwrap() {
        if e.debit_account_id == id {
            bal += e.amount;
        }
        if e.credit_account_id == id {
            bal -= e.amount;
        }
    }
    bal
}

#[test]
fn purchases_add_stock_at_weighted_average_cost() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    buy(&mut f, "10", "140");
    let p = product(&f);
    assert_eq!(p.stock_qty, dec("20"));
    assert_eq!(p.unit_cost, dec("12"));
    assert_eq!(account_balance(&f.conn, chart::INVENTORY), dec("240"));
    assert_eq!(account_balance(&f.conn, chart::CASH), dec("-240"));
}

#[test]
fn sale_reduces_stock_and_posts_cogs() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "4", "100");
    let sale = documents::record(&mut f.conn, &draft).unwrap();
    assert_eq!(sale.unit_cost, Some(dec("10")));
    assert_eq!(product(&f).stock_qty, dec("6"));

    let rows = journal::entries_for(&f.conn, ReferenceType::Sale, sale.id).unwrap();
    assert_eq!(rows.len(), 2);
    let cash = system_account_id(&f.conn, chart::CASH).unwrap();
    let revenue = system_account_id(&f.conn, chart::SALES).unwrap();
    let cogs = system_account_id(&f.conn, chart::COGS).unwrap();
    let inventory = system_account_id(&f.conn, chart::INVENTORY).unwrap();
    assert_eq!(
        (rows[0].debit_account_id, rows[0].credit_account_id, rows[0].amount),
        (cash, revenue, dec("100"))
    );
    assert_eq!(
        (rows[1].debit_account_id, rows[1].credit_account_id, rows[1].amount),
        (cogs, inventory, dec("40"))
    );
    assert!(rows[0].description.contains("counter sale"));
}

#[test]
fn credit_sale_posts_to_receivable() {
    let mut f = setup();
    let draft = SaleDraft {
        product_id: None,
        paid: false,
        ..sale_draft(&f, "1", "80")
    };
    documents::record(&mut f.conn, &draft).unwrap();
    assert_eq!(account_balance(&f.conn, chart::RECEIVABLE), dec("80"));
    assert_eq!(account_balance(&f.conn, chart::CASH), Decimal::ZERO);
}

#[test]
fn insufficient_stock_rolls_back_everything() {
    let mut f = setup();
    buy(&mut f, "2", "20");
    let draft = sale_draft(&f, "5", "125");
    let err = documents::record(&mut f.conn, &draft).unwrap_err();
    match err {
        BookError::InsufficientStock {
            sku,
            available,
            requested,
        } => {
            assert_eq!(sku, "W-1");
            assert_eq!(available, dec("2"));
            assert_eq!(requested, dec("5"));
        }
        other => panic!("expected InsufficientStock, got {:?}", other),
    }
    let sales: i64 = f
        .conn
        .query_row("SELECT COUNT(*) FROM sales", [], |r| r.get(0))
        .unwrap();
    assert_eq!(sales, 0);
    assert_eq!(product(&f).stock_qty, dec("2"));
    assert_eq!(account_balance(&f.conn, chart::SALES), Decimal::ZERO);
}

#[test]
fn sale_to_a_supplier_is_rejected() {
    let mut f = setup();
    let draft = SaleDraft {
        contact_id: Some(f.supplier),
        product_id: None,
        ..sale_draft(&f, "1", "10")
    };
    assert!(matches!(
        documents::record(&mut f.conn, &draft),
        Err(BookError::Validation(_))
    ));
}

#[test]
fn discard_and_reinstate_round_trip_stock_and_journal() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "3", "75");
    let sale = documents::record(&mut f.conn, &draft).unwrap();

    documents::discard::<Sale>(&mut f.conn, sale.id).unwrap();
    assert_eq!(product(&f).stock_qty, dec("10"));
    assert!(journal::entries_for(&f.conn, ReferenceType::Sale, sale.id)
        .unwrap()
        .is_empty());

    documents::reinstate::<Sale>(&mut f.conn, sale.id).unwrap();
    assert_eq!(product(&f).stock_qty, dec("7"));
    assert_eq!(
        journal::entries_for(&f.conn, ReferenceType::Sale, sale.id)
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn amend_replaces_old_effects() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "3", "75");
    let sale = documents::record(&mut f.conn, &draft).unwrap();
    let draft = sale_draft(&f, "5", "125");
    let amended = documents::amend(&mut f.conn, sale.id, &draft).unwrap();
    assert_eq!(amended.quantity, dec("5"));
    assert_eq!(product(&f).stock_qty, dec("5"));
    assert_eq!(account_balance(&f.conn, chart::SALES), dec("-125"));
    assert_eq!(account_balance(&f.conn, chart::COGS), dec("50"));
}

#[test]
fn discarding_a_purchase_that_was_sold_fails() {
    let mut f = setup();
    let purchase = buy(&mut f, "5", "50");
    let draft = sale_draft(&f, "4", "100");
    documents::record(&mut f.conn, &draft).unwrap();
    let err = documents::discard::<Purchase>(&mut f.conn, purchase.id).unwrap_err();
    assert!(matches!(err, BookError::InsufficientStock { .. }));
    assert_eq!(product(&f).stock_qty, dec("1"));
    assert_eq!(
        journal::entries_for(&f.conn, ReferenceType::Purchase, purchase.id)
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn discarded_sale_returns_stock_at_its_own_cost() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "10", "250");
    let sale = documents::record(&mut f.conn, &draft).unwrap();
    buy(&mut f, "10", "200");
    assert_eq!(product(&f).unit_cost, dec("20"));

    documents::discard::<Sale>(&mut f.conn, sale.id).unwrap();
    let p = product(&f);
    assert_eq!(p.stock_qty, dec("20"));
    assert_eq!(p.unit_cost, dec("15"));
    assert_eq!(
        p.stock_qty * p.unit_cost,
        account_balance(&f.conn, chart::INVENTORY)
    );
    assert_eq!(account_balance(&f.conn, chart::INVENTORY), dec("300"));

    let draft = sale_draft(&f, "20", "500");
    documents::record(&mut f.conn, &draft).unwrap();
    assert_eq!(account_balance(&f.conn, chart::INVENTORY), Decimal::ZERO);
}

#[test]
fn amend_and_reinstate_keep_the_captured_cost() {
    let mut f = setup();
    buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "5", "125");
    let sale = documents::record(&mut f.conn, &draft).unwrap();
    buy(&mut f, "5", "250");
    assert_eq!(product(&f).unit_cost, dec("30"));

    let draft = SaleDraft {
        note: Some("corrected note".into()),
        ..sale_draft(&f, "5", "125")
    };
    let amended = documents::amend(&mut f.conn, sale.id, &draft).unwrap();
    assert_eq!(amended.unit_cost, Some(dec("10")));
    assert_eq!(account_balance(&f.conn, chart::COGS), dec("50"));
    assert_eq!(product(&f).stock_qty, dec("10"));
    assert_eq!(product(&f).unit_cost, dec("30"));

    documents::discard::<Sale>(&mut f.conn, sale.id).unwrap();
    let back = documents::reinstate::<Sale>(&mut f.conn, sale.id).unwrap();
    assert_eq!(back.unit_cost, Some(dec("10")));
    assert_eq!(account_balance(&f.conn, chart::COGS), dec("50"));
    assert_eq!(product(&f).stock_qty, dec("10"));
}

#[test]
fn amending_a_partly_sold_purchase_applies_the_difference() {
    let mut f = setup();
    let purchase = buy(&mut f, "10", "100");
    let draft = sale_draft(&f, "1", "25");
    documents::record(&mut f.conn, &draft).unwrap();

    let fix = PurchaseDraft {
        date: d("2025-01-05"),
        contact_id: Some(f.supplier),
        product_id: Some(f.widget),
        quantity: dec("10"),
        amount: dec("100"),
        paid: true,
        note: Some("invoice 42".into()),
    };
    let amended = documents::amend(&mut f.conn, purchase.id, &fix).unwrap();
    assert_eq!(amended.note.as_deref(), Some("invoice 42"));
    let p = product(&f);
    assert_eq!(p.stock_qty, dec("9"));
    assert_eq!(p.unit_cost, dec("10"));

    let shrink = PurchaseDraft {
        quantity: dec("0.5"),
        amount: dec("5"),
        ..fix
    };
    let err = documents::amend(&mut f.conn, purchase.id, &shrink).unwrap_err();
    assert!(matches!(err, BookError::InsufficientStock { .. }));
    assert_eq!(product(&f).stock_qty, dec("9"));
    assert_eq!(account_balance(&f.conn, chart::INVENTORY), dec("90"));
}

#[test]
fn stock_value_overflow_is_a_validation_error() {
    let mut f = setup();
    buy(&mut f, "1", "50000000000000000000000000000");
    let err = documents::record(
        &mut f.conn,
        &PurchaseDraft {
            date: d("2025-01-06"),
            contact_id: Some(f.supplier),
            product_id: Some(f.widget),
            quantity: dec("1"),
            amount: dec("50000000000000000000000000000"),
            paid: true,
            note: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, BookError::Validation(_)));
    assert_eq!(product(&f).stock_qty, dec("1"));
}

#[test]
fn expense_and_income_move_cash() {
    let mut f = setup();
    let opex = system_account_id(&f.conn, chart::OPERATING).unwrap();
    let other = system_account_id(&f.conn, chart::OTHER_INCOME).unwrap();
    documents::record(
        &mut f.conn,
        &ExpenseDraft {
            date: d("2025-01-03"),
            account_id: opex,
            payee: "Landlord".into(),
            amount: dec("500"),
            note: None,
        },
    )
    .unwrap();
    let income = documents::record(
        &mut f.conn,
        &IncomeDraft {
            date: d("2025-01-04"),
            account_id: other,
            source: "Interest".into(),
            amount: dec("20"),
            note: None,
        },
    )
    .unwrap();
    assert_eq!(account_balance(&f.conn, chart::CASH), dec("-480"));

    documents::purge::<Income>(&mut f.conn, income.id).unwrap();
    assert_eq!(account_balance(&f.conn, chart::CASH), dec("-500"));
    assert!(Repo::<Income>::new(&f.conn).find(income.id).unwrap().is_none());
}

#[test]
fn expense_must_use_an_expense_account() {
    let mut f = setup();
    let revenue = system_account_id(&f.conn, chart::SALES).unwrap();
    let err = documents::record(
        &mut f.conn,
        &ExpenseDraft {
            date: d("2025-01-03"),
            account_id: revenue,
            payee: "Nobody".into(),
            amount: dec("5"),
            note: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, BookError::Validation(_)));
}
