// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::opt_date;
use crate::reports::{self, ReportLine};
use crate::utils::{fmt_money, id_for_account, maybe_print_json, money_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trial-balance", sub)) => trial_balance(conn, sub)?,
        Some(("pnl", sub)) => pnl(conn, sub)?,
        Some(("balance-sheet", sub)) => balance_sheet(conn, sub)?,
        Some(("cash-flow", sub)) => cash_flow(conn, sub)?,
        Some(("statement", sub)) => statement(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn json_out<T: serde::Serialize>(sub: &clap::ArgMatches, v: &T) -> Result<bool> {
    maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), v)
}

fn section(rows: &mut Vec<Vec<String>>, title: &str, lines: &[ReportLine], total: &rust_decimal::Decimal) {
    rows.push(vec![title.to_uppercase(), String::new()]);
    for l in lines {
        rows.push(vec![format!("  {}", l.name), fmt_money(&l.amount)]);
    }
    rows.push(vec![format!("Total {}", title.to_lowercase()), fmt_money(total)]);
}

fn trial_balance(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tb = reports::trial_balance(conn, opt_date(sub, "as_of")?)?;
    if json_out(sub, &tb)? {
        return Ok(());
    }
    let mut rows: Vec<Vec<String>> = tb
        .rows
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.r#type.to_string(),
                fmt_money(&r.debit),
                fmt_money(&r.credit),
            ]
        })
        .collect();
    rows.push(vec![
        "Total".into(),
        String::new(),
        fmt_money(&tb.total_debit),
        fmt_money(&tb.total_credit),
    ]);
    println!("{}", money_table(&["Account", "Type", "Debit", "Credit"], &[2, 3], rows));
    if !tb.balanced {
        println!("WARNING: trial balance does not balance");
    }
    Ok(())
}

fn pnl(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let p = reports::profit_and_loss(conn, opt_date(sub, "from")?, opt_date(sub, "to")?)?;
    if json_out(sub, &p)? {
        return Ok(());
    }
    let mut rows = Vec::new();
    section(&mut rows, "Revenue", &p.revenue, &p.total_revenue);
    rows.push(vec!["Cost of goods sold".into(), fmt_money(&p.cost_of_goods_sold)]);
    rows.push(vec!["Gross profit".into(), fmt_money(&p.gross_profit)]);
    section(
        &mut rows,
        "Operating expenses",
        &p.operating_expenses,
        &p.total_operating_expenses,
    );
    rows.push(vec!["Net profit".into(), fmt_money(&p.net_profit)]);
    println!("{}", money_table(&["", "Amount"], &[1], rows));
    Ok(())
}

fn balance_sheet(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let bs = reports::balance_sheet(conn, opt_date(sub, "as_of")?)?;
    if json_out(sub, &bs)? {
        return Ok(());
    }
    let mut rows = Vec::new();
    section(&mut rows, "Assets", &bs.assets, &bs.total_assets);
    section(&mut rows, "Liabilities", &bs.liabilities, &bs.total_liabilities);
    rows.push(vec!["EQUITY".into(), String::new()]);
    for l in &bs.equity {
        rows.push(vec![format!("  {}", l.name), fmt_money(&l.amount)]);
    }
    rows.push(vec!["  Retained earnings".into(), fmt_money(&bs.retained_earnings)]);
    rows.push(vec!["Total equity".into(), fmt_money(&bs.total_equity)]);
    println!("{}", money_table(&["", "Amount"], &[1], rows));
    if !bs.balanced {
        println!("WARNING: assets do not equal liabilities plus equity");
    }
    Ok(())
}

fn cash_flow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cf = reports::cash_flow(conn, opt_date(sub, "from")?, opt_date(sub, "to")?)?;
    if json_out(sub, &cf)? {
        return Ok(());
    }
    let mut rows = vec![vec![
        "Opening cash".to_string(),
        String::new(),
        String::new(),
        fmt_money(&cf.opening_cash),
    ]];
    for l in &cf.lines {
        rows.push(vec![
            l.source.to_string(),
            fmt_money(&l.inflow),
            fmt_money(&l.outflow),
            fmt_money(&l.net),
        ]);
    }
    rows.push(vec![
        "Net change".into(),
        fmt_money(&cf.total_inflow),
        fmt_money(&cf.total_outflow),
        fmt_money(&cf.net_change),
    ]);
    rows.push(vec![
        "Closing cash".into(),
        String::new(),
        String::new(),
        fmt_money(&cf.closing_cash),
    ]);
    println!(
        "{}",
        money_table(&["Source", "Inflow", "Outflow", "Net"], &[1, 2, 3], rows)
    );
    Ok(())
}

fn statement(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let account_id = id_for_account(conn, sub.get_one::<String>("account").unwrap())?;
    let st = reports::account_statement(
        conn,
        account_id,
        opt_date(sub, "from")?,
        opt_date(sub, "to")?,
    )?;
    if json_out(sub, &st)? {
        return Ok(());
    }
    println!(
        "{} ({}), opening balance {}",
        st.account.name,
        st.account.r#type,
        fmt_money(&st.opening_balance)
    );
    let rows = st
        .lines
        .iter()
        .map(|l| {
            vec![
                l.date.to_string(),
                format!("{} {}", l.reference_type, l.reference_id),
                l.description.clone(),
                fmt_money(&l.debit),
                fmt_money(&l.credit),
                fmt_money(&l.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        money_table(
            &["Date", "Ref", "Description", "Debit", "Credit", "Balance"],
            &[3, 4, 5],
            rows
        )
    );
    println!("Closing balance {}", fmt_money(&st.closing_balance));
    Ok(())
}
