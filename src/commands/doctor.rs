// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::Result;
use crate::reports;
use crate::utils::{get_base_currency, pretty_table};
use rusqlite::Connection;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub kind: &'static str,
    pub detail: String,
}

const DOCUMENT_TABLES: &[(&str, &str)] = &[
    ("sale", "sales"),
    ("purchase", "purchases"),
    ("expense", "expenses"),
    ("income", "incomes"),
];

fn collect(
    conn: &Connection,
    kind: &'static str,
    sql: &str,
    out: &mut Vec<Issue>,
) -> Result<()> {
    let mut stmt = conn.prepare(sql)?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let detail: String = r.get(0)?;
        out.push(Issue { kind, detail });
    }
    Ok(())
}

/// Runs every consistency check and returns what it found.
pub fn find_issues(conn: &Connection) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    let tb = reports::trial_balance(conn, None)?;
    if !tb.balanced {
        issues.push(Issue {
            kind: "unbalanced_ledger",
            detail: format!("debits {} vs credits {}", tb.total_debit, tb.total_credit),
        });
    }

    for (reference, table) in DOCUMENT_TABLES {
        collect(
            conn,
            "unposted_document",
            &format!(
                "SELECT '{reference} #' || d.id FROM {table} d
                 WHERE d.deleted_at IS NULL AND NOT EXISTS (
                     SELECT 1 FROM journal_entries j
                     WHERE j.reference_type='{reference}' AND j.reference_id=d.id)"
            ),
            &mut issues,
        )?;
        collect(
            conn,
            "orphan_posting",
            &format!(
                "SELECT DISTINCT '{reference} #' || j.reference_id FROM journal_entries j
                 LEFT JOIN {table} d ON d.id = j.reference_id
                 WHERE j.reference_type='{reference}' AND (d.id IS NULL OR d.deleted_at IS NOT NULL)"
            ),
            &mut issues,
        )?;
    }

    collect(
        conn,
        "negative_stock",
        "SELECT sku || ' (' || stock_qty || ')' FROM products WHERE CAST(stock_qty AS REAL) < 0",
        &mut issues,
    )?;

    let base = get_base_currency(conn)?;
    let mut stmt = conn.prepare(
        "SELECT name || ' (' || currency || ')' FROM accounts WHERE deleted_at IS NULL AND currency != ?1",
    )?;
    let mut cur = stmt.query([&base])?;
    while let Some(r) = cur.next()? {
        issues.push(Issue {
            kind: "foreign_currency_account",
            detail: r.get(0)?,
        });
    }

    for issue in &issues {
        warn!(kind = issue.kind, detail = %issue.detail, "doctor");
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> anyhow::Result<()> {
    let issues = find_issues(conn)?;
    if issues.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows = issues
            .into_iter()
            .map(|i| vec![i.kind.to_string(), i.detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
