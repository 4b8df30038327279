// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger reports folded in memory from journal rows.

use crate::error::{BookError, Result};
use crate::journal::{self, EntryFilter, chart, system_account_id};
use crate::models::{Account, AccountType, JournalEntry, ReferenceType};
use crate::repo::Repo;
use crate::validation::in_range;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub debit: Decimal,
    pub credit: Decimal,
}

impl Totals {
    /// Balance on the account's normal side.
    pub fn balance(&self, typ: AccountType) -> Decimal {
        if typ.debit_normal() {
            self.debit - self.credit
        } else {
            self.credit - self.debit
        }
    }

    fn is_empty(&self) -> bool {
        self.debit.is_zero() && self.credit.is_zero()
    }
}

/// Accounts (deleted ones included, they still carry history) in type/name order.
fn chart_of_accounts(conn: &Connection) -> Result<Vec<Account>> {
    Repo::<Account>::new(conn).find_where("1=1", &[], "type, name")
}

fn fold(accounts: &[Account], entries: &[JournalEntry]) -> Result<HashMap<i64, Totals>> {
    let known: HashSet<i64> = accounts.iter().map(|a| a.id).collect();
    let mut totals: HashMap<i64, Totals> = HashMap::new();
    for e in entries {
        for id in [e.debit_account_id, e.credit_account_id] {
            if !known.contains(&id) {
                return Err(BookError::Integrity(format!(
                    "journal entry {} references unknown account {}",
                    e.id, id
                )));
            }
        }
        let debit = &mut totals.entry(e.debit_account_id).or_default().debit;
        *debit = in_range(debit.checked_add(e.amount), "account total")?;
        let credit = &mut totals.entry(e.credit_account_id).or_default().credit;
        *credit = in_range(credit.checked_add(e.amount), "account total")?;
    }
    Ok(totals)
}

fn balances(conn: &Connection, filter: &EntryFilter) -> Result<(Vec<Account>, HashMap<i64, Totals>)> {
    let accounts = chart_of_accounts(conn)?;
    let entries = journal::entries(conn, filter)?;
    let totals = fold(&accounts, &entries)?;
    Ok((accounts, totals))
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub account_id: i64,
    pub name: String,
    pub amount: Decimal,
}

fn lines_of(
    accounts: &[Account],
    totals: &HashMap<i64, Totals>,
    typ: AccountType,
    skip: Option<i64>,
) -> (Vec<ReportLine>, Decimal) {
    let mut lines = Vec::new();
    let mut sum = Decimal::ZERO;
    for a in accounts.iter().filter(|a| a.r#type == typ && Some(a.id) != skip) {
        let Some(t) = totals.get(&a.id).filter(|t| !t.is_empty()) else {
            continue;
        };
        let amount = t.balance(typ);
        sum += amount;
        lines.push(ReportLine {
            account_id: a.id,
            name: a.name.clone(),
            amount,
        });
    }
    (lines, sum)
}

// ---------------------------------------------------------------------------
// Trial balance

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    pub account_id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    /// Net balance shown in the debit column (zero when credit-side).
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    pub as_of: Option<NaiveDate>,
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub balanced: bool,
}

pub fn trial_balance(conn: &Connection, as_of: Option<NaiveDate>) -> Result<TrialBalance> {
    let (accounts, totals) = balances(conn, &EntryFilter::until(as_of))?;
    let mut rows = Vec::new();
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;
    for a in &accounts {
        let Some(t) = totals.get(&a.id).filter(|t| !t.is_empty()) else {
            continue;
        };
        let net = t.debit - t.credit;
        let (debit, credit) = if net >= Decimal::ZERO {
            (net, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -net)
        };
        total_debit += debit;
        total_credit += credit;
        rows.push(TrialBalanceRow {
            account_id: a.id,
            name: a.name.clone(),
            r#type: a.r#type,
            total_debits: t.debit,
            total_credits: t.credit,
            debit,
            credit,
        });
    }
    Ok(TrialBalance {
        as_of,
        rows,
        total_debit,
        total_credit,
        balanced: total_debit == total_credit,
    })
}

// ---------------------------------------------------------------------------
// Profit and loss

#[derive(Debug, Clone, Serialize)]
pub struct ProfitAndLoss {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub revenue: Vec<ReportLine>,
    pub total_revenue: Decimal,
    pub cost_of_goods_sold: Decimal,
    pub gross_profit: Decimal,
    pub operating_expenses: Vec<ReportLine>,
    pub total_operating_expenses: Decimal,
    pub net_profit: Decimal,
}

pub fn profit_and_loss(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<ProfitAndLoss> {
    let (accounts, totals) = balances(conn, &EntryFilter::between(from, to))?;
    let cogs_id = system_account_id(conn, chart::COGS)?;
    let (revenue, total_revenue) = lines_of(&accounts, &totals, AccountType::Revenue, None);
    let cost_of_goods_sold = totals
        .get(&cogs_id)
        .map(|t| t.balance(AccountType::Expense))
        .unwrap_or_default();
    let (operating_expenses, total_operating_expenses) =
        lines_of(&accounts, &totals, AccountType::Expense, Some(cogs_id));
    let gross_profit = total_revenue - cost_of_goods_sold;
    Ok(ProfitAndLoss {
        from,
        to,
        revenue,
        total_revenue,
        cost_of_goods_sold,
        gross_profit,
        operating_expenses,
        total_operating_expenses,
        net_profit: gross_profit - total_operating_expenses,
    })
}

// ---------------------------------------------------------------------------
// Balance sheet

#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    pub as_of: Option<NaiveDate>,
    pub assets: Vec<ReportLine>,
    pub total_assets: Decimal,
    pub liabilities: Vec<ReportLine>,
    pub total_liabilities: Decimal,
    pub equity: Vec<ReportLine>,
    /// Net profit of every period up to `as_of`.
    pub retained_earnings: Decimal,
    pub total_equity: Decimal,
    pub balanced: bool,
}

pub fn balance_sheet(conn: &Connection, as_of: Option<NaiveDate>) -> Result<BalanceSheet> {
    let (accounts, totals) = balances(conn, &EntryFilter::until(as_of))?;
    let (assets, total_assets) = lines_of(&accounts, &totals, AccountType::Asset, None);
    let (liabilities, total_liabilities) =
        lines_of(&accounts, &totals, AccountType::Liability, None);
    let (equity, contributed) = lines_of(&accounts, &totals, AccountType::Equity, None);
    let (_, revenue) = lines_of(&accounts, &totals, AccountType::Revenue, None);
    let (_, expenses) = lines_of(&accounts, &totals, AccountType::Expense, None);
    let retained_earnings = revenue - expenses;
    let total_equity = contributed + retained_earnings;
    Ok(BalanceSheet {
        as_of,
        assets,
        total_assets,
        liabilities,
        total_liabilities,
        equity,
        retained_earnings,
        total_equity,
        balanced: total_assets == total_liabilities + total_equity,
    })
}

// ---------------------------------------------------------------------------
// Cash flow

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowLine {
    pub source: ReferenceType,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlow {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub opening_cash: Decimal,
    pub lines: Vec<CashFlowLine>,
    pub total_inflow: Decimal,
    pub total_outflow: Decimal,
    pub net_change: Decimal,
    pub closing_cash: Decimal,
}

pub fn cash_flow(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<CashFlow> {
    let accounts = chart_of_accounts(conn)?;
    let cash: HashSet<i64> = accounts.iter().filter(|a| a.cash).map(|a| a.id).collect();

    let mut opening_cash = Decimal::ZERO;
    if let Some(start) = from {
        let before = EntryFilter::until(start.pred_opt());
        for e in journal::entries(conn, &before)? {
            if cash.contains(&e.debit_account_id) {
                opening_cash += e.amount;
            }
            if cash.contains(&e.credit_account_id) {
                opening_cash -= e.amount;
            }
        }
    }

    let mut by_source: BTreeMap<ReferenceType, (Decimal, Decimal)> = BTreeMap::new();
    for e in journal::entries(conn, &EntryFilter::between(from, to))? {
        let into = cash.contains(&e.debit_account_id);
        let out_of = cash.contains(&e.credit_account_id);
        // transfers between cash accounts don't move cash
        if into == out_of {
            continue;
        }
        let slot = by_source.entry(e.reference_type).or_default();
        if into {
            slot.0 += e.amount;
        } else {
            slot.1 += e.amount;
        }
    }

    let mut lines = Vec::new();
    let mut total_inflow = Decimal::ZERO;
    let mut total_outflow = Decimal::ZERO;
    for (source, (inflow, outflow)) in by_source {
        total_inflow += inflow;
        total_outflow += outflow;
        lines.push(CashFlowLine {
            source,
            inflow,
            outflow,
            net: inflow - outflow,
        });
    }
    let net_change = total_inflow - total_outflow;
    Ok(CashFlow {
        from,
        to,
        opening_cash,
        lines,
        total_inflow,
        total_outflow,
        net_change,
        closing_cash: opening_cash + net_change,
    })
}

// ---------------------------------------------------------------------------
// Account statement

#[derive(Debug, Clone, Serialize)]
pub struct StatementLine {
    pub entry_id: i64,
    pub date: NaiveDate,
    pub reference_type: ReferenceType,
    pub reference_id: i64,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountStatement {
    pub account: Account,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub opening_balance: Decimal,
    pub lines: Vec<StatementLine>,
    pub closing_balance: Decimal,
}

pub fn account_statement(
    conn: &Connection,
    account_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<AccountStatement> {
    let account = Repo::<Account>::new(conn)
        .find(account_id)?
        .ok_or_else(|| BookError::not_found("Account", account_id))?;
    let typ = account.r#type;
    let signed = |e: &JournalEntry| -> (Decimal, Decimal) {
        if e.debit_account_id == account_id {
            (e.amount, Decimal::ZERO)
        } else {
            (Decimal::ZERO, e.amount)
        }
    };

    let mut opening = Totals::default();
    if let Some(start) = from {
        let filter = EntryFilter {
            to: start.pred_opt(),
            account_id: Some(account_id),
            ..EntryFilter::default()
        };
        for e in journal::entries(conn, &filter)? {
            let (d, c) = signed(&e);
            opening.debit += d;
            opening.credit += c;
        }
    }
    let opening_balance = opening.balance(typ);

    let filter = EntryFilter {
        from,
        to,
        account_id: Some(account_id),
        ..EntryFilter::default()
    };
    let mut running = opening;
    let mut lines = Vec::new();
    for e in journal::entries(conn, &filter)? {
        let (debit, credit) = signed(&e);
        running.debit += debit;
        running.credit += credit;
        lines.push(StatementLine {
            entry_id: e.id,
            date: e.date,
            reference_type: e.reference_type,
            reference_id: e.reference_id,
            description: e.description,
            debit,
            credit,
            balance: running.balance(typ),
        });
    }
    Ok(AccountStatement {
        account,
        from,
        to,
        opening_balance,
        lines,
        closing_balance: running.balance(typ),
    })
}
