// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Chart of accounts and journal posting.
//!
//! Every journal row is two-sided (one debit account, one credit account,
//! one positive amount), so a posting group balances row by row. Compound
//! manual entries are checked for balance as a whole and then split into
//! such rows by [`pair_legs`].

use crate::error::{BookError, Result};
use crate::models::{Account, AccountDraft, AccountType, JournalEntry, ReferenceType};
use crate::repo::{Entity, ListQuery, Page, Repo, date_value, decimal_value};
use crate::utils::{get_base_currency, get_setting, set_setting};
use crate::validation::in_range;
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Names of the accounts seeded into every book.
pub mod chart {
    pub const CASH: &str = "Cash";
    pub const RECEIVABLE: &str = "Accounts Receivable";
    pub const INVENTORY: &str = "Inventory";
    pub const PAYABLE: &str = "Accounts Payable";
    pub const EQUITY: &str = "Owner's Equity";
    pub const SALES: &str = "Sales Revenue";
    pub const OTHER_INCOME: &str = "Other Income";
    pub const COGS: &str = "Cost of Goods Sold";
    pub const OPERATING: &str = "Operating Expenses";
}

const SYSTEM_CHART: &[(&str, AccountType, bool)] = &[
    (chart::CASH, AccountType::Asset, true),
    (chart::RECEIVABLE, AccountType::Asset, false),
    (chart::INVENTORY, AccountType::Asset, false),
    (chart::PAYABLE, AccountType::Liability, false),
    (chart::EQUITY, AccountType::Equity, false),
    (chart::SALES, AccountType::Revenue, false),
    (chart::OTHER_INCOME, AccountType::Revenue, false),
    (chart::COGS, AccountType::Expense, false),
    (chart::OPERATING, AccountType::Expense, false),
];

pub fn seed_chart(conn: &Connection) -> Result<()> {
    let ccy = get_base_currency(conn)?;
    for (name, typ, cash) in SYSTEM_CHART {
        conn.execute(
            "INSERT OR IGNORE INTO accounts(name, type, currency, cash, system) VALUES (?1, ?2, ?3, ?4, 1)",
            params![name, typ, ccy, cash],
        )?;
    }
    Ok(())
}

pub fn system_account_id(conn: &Connection, name: &str) -> Result<i64> {
    conn.query_row(
        "SELECT id FROM accounts WHERE name=?1 AND system=1",
        params![name],
        |r| r.get(0),
    )
    .optional()?
    .ok_or_else(|| BookError::Integrity(format!("system account '{}' is missing", name)))
}

pub fn create_account(conn: &Connection, draft: &AccountDraft) -> Result<Account> {
    let account = Repo::<Account>::new(conn).create(draft)?;
    info!(id = account.id, name = %account.name, "account created");
    Ok(account)
}

/// System accounts keep their name and type; other fields stay editable.
pub fn update_account(conn: &Connection, id: i64, draft: &AccountDraft) -> Result<Account> {
    let repo = Repo::<Account>::new(conn);
    let current = repo.get(id)?;
    if current.system && (current.name != draft.name.trim() || current.r#type != draft.r#type) {
        return Err(BookError::Validation(format!(
            "system account '{}' cannot be renamed or retyped",
            current.name
        )));
    }
    repo.update(id, draft)
}

pub fn delete_account(conn: &Connection, id: i64) -> Result<()> {
    let repo = Repo::<Account>::new(conn);
    let current = repo.get(id)?;
    if current.system {
        return Err(BookError::Validation(format!(
            "system account '{}' cannot be removed",
            current.name
        )));
    }
    repo.soft_delete(id)
}

/// Fails with `Conflict` while journal rows still reference the account.
pub fn purge_account(conn: &Connection, id: i64) -> Result<()> {
    let repo = Repo::<Account>::new(conn);
    let current = repo
        .find(id)?
        .ok_or_else(|| BookError::not_found(Account::NAME, id))?;
    if current.system {
        return Err(BookError::Validation(format!(
            "system account '{}' cannot be removed",
            current.name
        )));
    }
    repo.hard_delete(id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

/// One side of a compound entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub account_id: i64,
    pub side: Side,
    pub amount: Decimal,
}

/// One journal row to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JournalLine {
    pub debit: i64,
    pub credit: i64,
    pub amount: Decimal,
}

impl JournalLine {
    pub fn new(debit: i64, credit: i64, amount: Decimal) -> Self {
        Self {
            debit,
            credit,
            amount,
        }
    }
}

/// Checks that debits equal credits and splits the legs into two-sided rows.
pub fn pair_legs(legs: &[Leg]) -> Result<Vec<JournalLine>> {
    let mut debits: Vec<(i64, Decimal)> = Vec::new();
    let mut credits: Vec<(i64, Decimal)> = Vec::new();
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    for leg in legs {
        if leg.amount <= Decimal::ZERO {
            return Err(BookError::Validation(format!(
                "leg amount must be positive, got {}",
                leg.amount
            )));
        }
        match leg.side {
            Side::Debit => {
                total_debit = in_range(total_debit.checked_add(leg.amount), "debit total")?;
                debits.push((leg.account_id, leg.amount));
            }
            Side::Credit => {
                total_credit = in_range(total_credit.checked_add(leg.amount), "credit total")?;
                credits.push((leg.account_id, leg.amount));
            }
        }
    }
    if debits.is_empty() || credits.is_empty() {
        return Err(BookError::Validation(
            "an entry needs at least one debit and one credit".into(),
        ));
    }
    if total_debit != total_credit {
        return Err(BookError::Unbalanced {
            debits: total_debit,
            credits: total_credit,
        });
    }
    let debit_ids: HashSet<i64> = debits.iter().map(|(id, _)| *id).collect();
    if let Some((id, _)) = credits.iter().find(|(id, _)| debit_ids.contains(id)) {
        return Err(BookError::Validation(format!(
            "account {} appears on both sides",
            id
        )));
    }

    let mut lines = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debits.len() && j < credits.len() {
        let take = debits[i].1.min(credits[j].1);
        lines.push(JournalLine::new(debits[i].0, credits[j].0, take));
        debits[i].1 -= take;
        credits[j].1 -= take;
        if debits[i].1.is_zero() {
            i += 1;
        }
        if credits[j].1.is_zero() {
            j += 1;
        }
    }
    Ok(lines)
}

fn check_postable(conn: &Connection, id: i64, seen: &mut HashSet<i64>) -> Result<()> {
    if seen.contains(&id) {
        return Ok(());
    }
    let account = Repo::<Account>::new(conn).get(id)?;
    if !account.active {
        return Err(BookError::Validation(format!(
            "account '{}' is inactive",
            account.name
        )));
    }
    seen.insert(id);
    Ok(())
}

/// Writes one posting group. Taking a `Transaction` keeps the group atomic
/// with whatever business write produced it.
pub fn post(
    tx: &Transaction<'_>,
    reference: ReferenceType,
    reference_id: i64,
    date: NaiveDate,
    description: &str,
    lines: &[JournalLine],
) -> Result<Vec<i64>> {
    if lines.is_empty() {
        return Err(BookError::Validation("nothing to post".into()));
    }
    let mut seen = HashSet::new();
    let mut ids = Vec::with_capacity(lines.len());
    let mut total = Decimal::ZERO;
    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(BookError::Validation(format!(
                "journal amount must be positive, got {}",
                line.amount
            )));
        }
        if line.debit == line.credit {
            return Err(BookError::Validation(format!(
                "account {} cannot be debited and credited in one row",
                line.debit
            )));
        }
        check_postable(tx, line.debit, &mut seen)?;
        check_postable(tx, line.credit, &mut seen)?;
        tx.execute(
            "INSERT INTO journal_entries(date, reference_type, reference_id, debit_account_id, credit_account_id, amount, description)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                date_value(date),
                reference,
                reference_id,
                line.debit,
                line.credit,
                decimal_value(line.amount),
                description
            ],
        )?;
        ids.push(tx.last_insert_rowid());
        total = in_range(total.checked_add(line.amount), "posting total")?;
    }
    info!(%reference, reference_id, rows = ids.len(), %total, "posted");
    Ok(ids)
}

pub fn unpost(tx: &Transaction<'_>, reference: ReferenceType, reference_id: i64) -> Result<usize> {
    let n = tx.execute(
        "DELETE FROM journal_entries WHERE reference_type=?1 AND reference_id=?2",
        params![reference, reference_id],
    )?;
    debug!(%reference, reference_id, rows = n, "unposted");
    Ok(n)
}

/// Last manual reference id handed out; voided ids are never reissued.
const MANUAL_SEQ: &str = "manual_seq";

/// Posts a balanced compound entry under the next manual reference id.
pub fn post_manual(
    conn: &mut Connection,
    date: NaiveDate,
    description: &str,
    legs: &[Leg],
) -> Result<i64> {
    let lines = pair_legs(legs)?;
    let tx = conn.transaction()?;
    let issued: i64 = tx.query_row(
        "SELECT COALESCE(MAX(reference_id), 0) FROM journal_entries WHERE reference_type='manual'",
        [],
        |r| r.get(0),
    )?;
    let last = get_setting(&tx, MANUAL_SEQ)?
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(0);
    let reference_id = last.max(issued) + 1;
    set_setting(&tx, MANUAL_SEQ, &reference_id.to_string())?;
    post(&tx, ReferenceType::Manual, reference_id, date, description, &lines)?;
    tx.commit()?;
    Ok(reference_id)
}

/// Removes a manual entry group.
pub fn void_manual(conn: &mut Connection, reference_id: i64) -> Result<usize> {
    let tx = conn.transaction()?;
    let n = unpost(&tx, ReferenceType::Manual, reference_id)?;
    if n == 0 {
        return Err(BookError::not_found("Manual entry", reference_id));
    }
    tx.commit()?;
    info!(reference_id, rows = n, "manual entry voided");
    Ok(n)
}

#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub account_id: Option<i64>,
    pub reference: Option<ReferenceType>,
}

impl EntryFilter {
    pub fn until(to: Option<NaiveDate>) -> Self {
        Self {
            to,
            ..Self::default()
        }
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            from,
            to,
            ..Self::default()
        }
    }

    pub fn to_sql(&self) -> (String, Vec<Value>) {
        let mut clause = String::from("1=1");
        let mut args: Vec<Value> = Vec::new();
        if let Some(from) = self.from {
            clause.push_str(" AND date >= ?");
            args.push(date_value(from));
        }
        if let Some(to) = self.to {
            clause.push_str(" AND date <= ?");
            args.push(date_value(to));
        }
        if let Some(acct) = self.account_id {
            clause.push_str(" AND (debit_account_id = ? OR credit_account_id = ?)");
            args.push(Value::Integer(acct));
            args.push(Value::Integer(acct));
        }
        if let Some(reference) = self.reference {
            clause.push_str(" AND reference_type = ?");
            args.push(Value::Text(reference.as_str().to_string()));
        }
        (clause, args)
    }
}

/// Journal rows matching the filter, oldest first.
pub fn entries(conn: &Connection, filter: &EntryFilter) -> Result<Vec<JournalEntry>> {
    let (clause, args) = filter.to_sql();
    Repo::<JournalEntry>::new(conn).find_where(&clause, &args, "date, id")
}

/// Paginated journal listing, narrowed by the filter.
pub fn list_entries(
    conn: &Connection,
    query: &ListQuery,
    filter: &EntryFilter,
) -> Result<Page<JournalEntry>> {
    let (clause, args) = filter.to_sql();
    Repo::<JournalEntry>::new(conn).find_all_where(query, &clause, args)
}

pub fn entries_for(
    conn: &Connection,
    reference: ReferenceType,
    reference_id: i64,
) -> Result<Vec<JournalEntry>> {
    Repo::<JournalEntry>::new(conn).find_where(
        "reference_type = ? AND reference_id = ?",
        &[
            Value::Text(reference.as_str().to_string()),
            Value::Integer(reference_id),
        ],
        "id",
    )
}
