// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use rusqlite::Connection;
use tillbook::commands::{self, doctor};
use tillbook::models::{Product, Sale};
use tillbook::repo::{ListQuery, Repo, Scope};
use tillbook::{cli, db, reports};

fn run(conn: &mut Connection, args: &[&str]) {
    let mut argv = vec!["tillbook"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("product", sub)) => commands::products::handle(conn, sub).unwrap(),
        Some(("contact", sub)) => commands::contacts::handle(conn, sub).unwrap(),
        Some(("purchase", sub)) => commands::purchases::handle(conn, sub).unwrap(),
        Some(("sale", sub)) => commands::sales::handle(conn, sub).unwrap(),
        Some(("expense", sub)) => commands::expenses::handle(conn, sub).unwrap(),
        Some(("journal", sub)) => commands::journal::handle(conn, sub).unwrap(),
        Some(("settings", sub)) => commands::settings::handle(conn, sub).unwrap(),
        other => panic!("unexpected command {:?}", other.map(|(n, _)| n)),
    }
}

#[test]
fn list_flags_parse_into_a_query() {
    let matches = cli::build_cli().get_matches_from([
        "tillbook", "contact", "list", "--page", "2", "--limit", "5", "-s", "acme", "--sort",
        "name", "--order", "asc", "--all",
    ]);
    let Some(("contact", c)) = matches.subcommand() else {
        panic!("no contact subcommand");
    };
    let Some(("list", list)) = c.subcommand() else {
        panic!("no list subcommand");
    };
    let q = commands::list_query(list);
    assert_eq!(q.page, 2);
    assert_eq!(q.limit, 5);
    assert_eq!(q.search.as_deref(), Some("acme"));
    assert_eq!(q.sort.as_deref(), Some("name"));
    assert_eq!(q.scope, Scope::All);
}

#[test]
fn deleted_and_all_conflict() {
    let res = cli::build_cli().try_get_matches_from([
        "tillbook", "sale", "list", "--deleted", "--all",
    ]);
    assert!(res.is_err());
}

#[test]
fn journal_list_has_no_deleted_scope() {
    let res = cli::build_cli().try_get_matches_from(["tillbook", "journal", "list", "--deleted"]);
    assert!(res.is_err());

    let matches = cli::build_cli().get_matches_from(["tillbook", "journal", "list", "--page", "2"]);
    let Some(("journal", j)) = matches.subcommand() else {
        panic!("no journal subcommand");
    };
    let Some(("list", list)) = j.subcommand() else {
        panic!("no list subcommand");
    };
    let q = commands::list_query(list);
    assert_eq!(q.page, 2);
    assert_eq!(q.scope, Scope::Active);
}

#[test]
fn journal_post_collects_repeated_legs() {
    let matches = cli::build_cli().get_matches_from([
        "tillbook",
        "journal",
        "post",
        "--description",
        "split",
        "--debit",
        "Cash=70",
        "--debit",
        "Inventory=30",
        "--credit",
        "Owner's Equity=100",
    ]);
    let Some(("journal", j)) = matches.subcommand() else {
        panic!("no journal subcommand");
    };
    let Some(("post", post)) = j.subcommand() else {
        panic!("no post subcommand");
    };
    let debits: Vec<&String> = post.get_many::<String>("debit").unwrap().collect();
    assert_eq!(debits.len(), 2);
}

#[test]
fn commands_drive_a_full_trading_day() {
    let mut conn = db::open_in_memory().unwrap();
    run(&mut conn, &["settings", "set-company", "Corner Shop"]);
    run(&mut conn, &["product", "add", "--sku", "TEA", "--name", "Tea", "--price", "4.50"]);
    run(
        &mut conn,
        &["journal", "post", "--date", "2025-03-01", "--description", "Capital", "--debit", "Cash=500", "--credit", "Owner's Equity=500"],
    );
    run(
        &mut conn,
        &["purchase", "add", "--date", "2025-03-02", "--product", "TEA", "--qty", "20", "--amount", "40"],
    );
    run(&mut conn, &["sale", "add", "--date", "2025-03-03", "--product", "TEA", "--qty", "2"]);
    run(
        &mut conn,
        &["expense", "add", "--date", "2025-03-04", "--payee", "Power Co", "--amount", "12.25"],
    );

    let tea = Repo::<Product>::new(&conn)
        .find_all(&ListQuery::default().with_search("tea"))
        .unwrap()
        .data
        .remove(0);
    assert_eq!(tea.stock_qty, Decimal::from(18));
    assert_eq!(tea.unit_cost, Decimal::from(2));

    let sale = Repo::<Sale>::new(&conn)
        .find_all(&ListQuery::default())
        .unwrap()
        .data
        .remove(0);
    // price times quantity when --amount is omitted
    assert_eq!(sale.amount, "9.00".parse::<Decimal>().unwrap());
    assert!(sale.paid);

    let pnl = reports::profit_and_loss(&conn, None, None).unwrap();
    assert_eq!(pnl.net_profit, "-7.25".parse::<Decimal>().unwrap());
    assert!(reports::balance_sheet(&conn, None).unwrap().balanced);
    assert!(doctor::find_issues(&conn).unwrap().is_empty());
}

#[test]
fn doctor_flags_orphan_postings_and_foreign_accounts() {
    let mut conn = db::open_in_memory().unwrap();
    run(&mut conn, &["product", "add", "--sku", "X", "--name", "X"]);
    run(&mut conn, &["purchase", "add", "--product", "X", "--amount", "10"]);
    conn.execute("UPDATE purchases SET deleted_at=datetime('now')", [])
        .unwrap();
    conn.execute(
        "INSERT INTO accounts(name, type, currency) VALUES ('Euro Bank', 'asset', 'EUR')",
        [],
    )
    .unwrap();
    let kinds: Vec<&str> = doctor::find_issues(&conn)
        .unwrap()
        .iter()
        .map(|i| i.kind)
        .collect();
    assert!(kinds.contains(&"orphan_posting"));
    assert!(kinds.contains(&"foreign_currency_account"));
}

#[test]
fn on_disk_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("books.sqlite");
    {
        let mut conn = db::open_or_init(Some(path.as_path())).unwrap();
        run(&mut conn, &["contact", "add", "--name", "Acme", "--kind", "customer"]);
        run(&mut conn, &["settings", "set-currency", "eur"]);
    }
    assert!(path.exists());
    let conn = db::open_or_init(Some(path.as_path())).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM contacts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
    // reopening must not duplicate the seeded chart
    let system: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts WHERE system=1", [], |r| r.get(0))
        .unwrap();
    assert_eq!(system, 9);
    assert_eq!(tillbook::utils::get_base_currency(&conn).unwrap(), "EUR");
}
