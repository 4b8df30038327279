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
use tillbook::journal::{self, Leg, Side, chart, system_account_id};
use tillbook::models::{
    ExpenseDraft, IncomeDraft, Product, ProductDraft, PurchaseDraft, ReferenceType, SaleDraft,
};
use tillbook::reports;
use tillbook::repo::Repo;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

/// Capital 1000 on Jan 1, stock bought Jan 5, one sale Jan 10,
/// rent paid Feb 1 and interest received Feb 2.
fn setup() -> Connection {
    let mut conn = db::open_in_memory().unwrap();
    let cash = system_account_id(&conn, chart::CASH).unwrap();
    let equity = system_account_id(&conn, chart::EQUITY).unwrap();
    journal::post_manual(
        &mut conn,
        d("2025-01-01"),
        "Owner investment",
        &[
            Leg { account_id: cash, side: Side::Debit, amount: dec("1000") },
            Leg { account_id: equity, side: Side::Credit, amount: dec("1000") },
        ],
    )
    .unwrap();
    let widget = Repo::<Product>::new(&conn)
        .create(&ProductDraft {
            sku: "W-1".into(),
            name: "Widget".into(),
            unit_price: dec("30"),
        })
        .unwrap()
        .id;
    documents::record(
        &mut conn,
        &PurchaseDraft {
            date: d("2025-01-05"),
            contact_id: None,
            product_id: Some(widget),
            quantity: dec("10"),
            amount: dec("200"),
            paid: true,
            note: None,
        },
    )
    .unwrap();
    documents::record(
        &mut conn,
        &SaleDraft {
            date: d("2025-01-10"),
            contact_id: None,
            product_id: Some(widget),
            quantity: dec("4"),
            amount: dec("120"),
            paid: true,
            note: None,
        },
    )
    .unwrap();
    let opex = system_account_id(&conn, chart::OPERATING).unwrap();
    documents::record(
        &mut conn,
        &ExpenseDraft {
            date: d("2025-02-01"),
            account_id: opex,
            payee: "Landlord".into(),
            amount: dec("50"),
            note: None,
        },
    )
    .unwrap();
    let other = system_account_id(&conn, chart::OTHER_INCOME).unwrap();
    documents::record(
        &mut conn,
        &IncomeDraft {
            date: d("2025-02-02"),
            account_id: other,
            source: "Bank interest".into(),
            amount: dec("5"),
            note: None,
        },
    )
    .unwrap();
    conn
}

#[test]
fn trial_balance_balances() {
    let conn = setup();
    let tb = reports::trial_balance(&conn, None).unwrap();
    assert!(tb.balanced);
    assert_eq!(tb.total_debit, tb.total_credit);
    let cash = tb.rows.iter().find(|r| r.name == chart::CASH).unwrap();
    // 1000 - 200 + 120 - 50 + 5
    assert_eq!(cash.debit, dec("875"));
    assert_eq!(cash.credit, Decimal::ZERO);
}

#[test]
fn trial_balance_as_of_ignores_later_entries() {
    let conn = setup();
    let tb = reports::trial_balance(&conn, Some(d("2025-01-01"))).unwrap();
    assert_eq!(tb.rows.len(), 2);
    assert_eq!(tb.total_debit, dec("1000"));
}

#[test]
fn profit_and_loss_splits_gross_and_net() {
    let conn = setup();
    let pnl = reports::profit_and_loss(&conn, None, None).unwrap();
    assert_eq!(pnl.total_revenue, dec("125"));
    assert_eq!(pnl.cost_of_goods_sold, dec("80"));
    assert_eq!(pnl.gross_profit, dec("45"));
    assert_eq!(pnl.total_operating_expenses, dec("50"));
    assert_eq!(pnl.net_profit, dec("-5"));
    assert_eq!(
        pnl.net_profit,
        pnl.gross_profit - pnl.total_operating_expenses
    );
    assert!(pnl.operating_expenses.iter().all(|l| l.name != chart::COGS));
}

#[test]
fn profit_and_loss_respects_the_period() {
    let conn = setup();
    let jan = reports::profit_and_loss(&conn, Some(d("2025-01-01")), Some(d("2025-01-31"))).unwrap();
    assert_eq!(jan.total_revenue, dec("120"));
    assert_eq!(jan.net_profit, dec("40"));
}

#[test]
fn balance_sheet_balances_with_retained_earnings() {
    let conn = setup();
    let bs = reports::balance_sheet(&conn, None).unwrap();
    assert!(bs.balanced);
    // cash 875 + inventory 120
    assert_eq!(bs.total_assets, dec("995"));
    assert_eq!(bs.total_liabilities, Decimal::ZERO);
    assert_eq!(bs.retained_earnings, dec("-5"));
    assert_eq!(bs.total_equity, dec("995"));
}

#[test]
fn cash_flow_groups_by_source() {
    let conn = setup();
    let cf = reports::cash_flow(&conn, Some(d("2025-01-02")), None).unwrap();
    assert_eq!(cf.opening_cash, dec("1000"));
    let by = |src: ReferenceType| cf.lines.iter().find(|l| l.source == src).unwrap();
    assert_eq!(by(ReferenceType::Purchase).outflow, dec("200"));
    assert_eq!(by(ReferenceType::Sale).inflow, dec("120"));
    assert_eq!(by(ReferenceType::Expense).net, dec("-50"));
    assert_eq!(by(ReferenceType::Income).inflow, dec("5"));
    assert_eq!(cf.net_change, dec("-125"));
    assert_eq!(cf.closing_cash, dec("875"));
    assert!(cf.lines.iter().all(|l| l.source != ReferenceType::Manual));
}

#[test]
fn statement_runs_a_balance_on_the_normal_side() {
    let conn = setup();
    let cash = system_account_id(&conn, chart::CASH).unwrap();
    let st = reports::account_statement(&conn, cash, Some(d("2025-01-05")), None).unwrap();
    assert_eq!(st.opening_balance, dec("1000"));
    let balances: Vec<Decimal> = st.lines.iter().map(|l| l.balance).collect();
    assert_eq!(balances, vec![dec("800"), dec("920"), dec("870"), dec("875")]);
    assert_eq!(st.closing_balance, dec("875"));

    let revenue = system_account_id(&conn, chart::SALES).unwrap();
    let st = reports::account_statement(&conn, revenue, None, None).unwrap();
    assert_eq!(st.closing_balance, dec("120"));
}
