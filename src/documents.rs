// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Sales, purchases, expenses and incomes.
//!
//! Each change to a document runs the row write, its stock movement and its
//! journal group in one SQLite transaction. Discarding a document reverses
//! the stock movement and drops its journal rows; reinstating re-applies both.

use crate::error::{BookError, Result};
use crate::journal::{self, JournalLine, chart, system_account_id};
use crate::models::{Expense, Income, Product, Purchase, ReferenceType, Sale};
use crate::repo::{Draft, Entity, Repo, Scope, decimal_value};
use crate::validation::in_range;
use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, params};
use rust_decimal::Decimal;
use tracing::info;

const COST_DP: u32 = 6;

pub trait Document: Entity {
    const REFERENCE: ReferenceType;

    fn id(&self) -> i64;
    fn date(&self) -> NaiveDate;
    fn is_deleted(&self) -> bool;
    fn describe(&self) -> String;

    /// Stock side effects, run after the row is written.
    fn settle(&self, _tx: &Transaction<'_>) -> Result<()> {
        Ok(())
    }

    fn unsettle(&self, _tx: &Transaction<'_>) -> Result<()> {
        Ok(())
    }

    /// Moves stock from `previous` (the row before an amend) to `self`.
    fn resettle(&self, previous: &Self, tx: &Transaction<'_>) -> Result<()> {
        previous.unsettle(tx)?;
        self.settle(tx)
    }

    fn journal_lines(&self, conn: &Connection) -> Result<Vec<JournalLine>>;
}

/// Reloads the row (settling may capture costs on it) and posts its group.
fn post_current<D: Document>(tx: &Transaction<'_>, id: i64) -> Result<D> {
    let doc = Repo::<D>::new(tx).get_in(id, Scope::All)?;
    let lines = doc.journal_lines(tx)?;
    journal::post(tx, D::REFERENCE, doc.id(), doc.date(), &doc.describe(), &lines)?;
    Ok(doc)
}

fn apply<D: Document>(tx: &Transaction<'_>, doc: &D) -> Result<D> {
    doc.settle(tx)?;
    post_current(tx, doc.id())
}

fn revert<D: Document>(tx: &Transaction<'_>, doc: &D) -> Result<()> {
    doc.unsettle(tx)?;
    journal::unpost(tx, D::REFERENCE, doc.id())?;
    Ok(())
}

pub fn record<D>(conn: &mut Connection, draft: &D) -> Result<D::Target>
where
    D: Draft,
    D::Target: Document,
{
    let tx = conn.transaction()?;
    let created = Repo::<D::Target>::new(&tx).create(draft)?;
    let doc = apply(&tx, &created)?;
    tx.commit()?;
    let kind = <D::Target as Document>::REFERENCE;
    info!(%kind, id = doc.id(), "recorded");
    Ok(doc)
}

/// Full-record update: the journal group is rebuilt and stock moves by the
/// difference between the old and new row.
pub fn amend<D>(conn: &mut Connection, id: i64, draft: &D) -> Result<D::Target>
where
    D: Draft,
    D::Target: Document,
{
    let kind = <D::Target as Document>::REFERENCE;
    let tx = conn.transaction()?;
    let repo = Repo::<D::Target>::new(&tx);
    let old = repo.get(id)?;
    journal::unpost(&tx, kind, id)?;
    let updated = repo.update(id, draft)?;
    updated.resettle(&old, &tx)?;
    let doc = post_current(&tx, id)?;
    tx.commit()?;
    info!(%kind, id, "amended");
    Ok(doc)
}

pub fn discard<E: Document>(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let repo = Repo::<E>::new(&tx);
    let doc = repo.get(id)?;
    revert(&tx, &doc)?;
    repo.soft_delete(id)?;
    tx.commit()?;
    info!(kind = %E::REFERENCE, id, "discarded");
    Ok(())
}

pub fn reinstate<E: Document>(conn: &mut Connection, id: i64) -> Result<E> {
    let tx = conn.transaction()?;
    let restored = Repo::<E>::new(&tx).restore(id)?;
    let doc = apply(&tx, &restored)?;
    tx.commit()?;
    info!(kind = %E::REFERENCE, id, "reinstated");
    Ok(doc)
}

pub fn purge<E: Document>(conn: &mut Connection, id: i64) -> Result<()> {
    let tx = conn.transaction()?;
    let repo = Repo::<E>::new(&tx);
    let doc = repo.find(id)?.ok_or_else(|| BookError::not_found(E::NAME, id))?;
    if !doc.is_deleted() {
        revert(&tx, &doc)?;
    }
    repo.hard_delete(id)?;
    tx.commit()?;
    info!(kind = %E::REFERENCE, id, "purged");
    Ok(())
}

fn set_stock(tx: &Transaction<'_>, product_id: i64, qty: Decimal, cost: Decimal) -> Result<()> {
    tx.execute(
        "UPDATE products SET stock_qty=?1, unit_cost=?2, updated_at=datetime('now') WHERE id=?3",
        params![decimal_value(qty), decimal_value(cost), product_id],
    )?;
    Ok(())
}

fn any_product(tx: &Transaction<'_>, id: i64) -> Result<Product> {
    Repo::<Product>::new(tx)
        .find(id)?
        .ok_or_else(|| BookError::not_found(Product::NAME, id))
}

fn short(product: &Product, available: Decimal, requested: Decimal) -> BookError {
    BookError::InsufficientStock {
        sku: product.sku.clone(),
        available,
        requested,
    }
}

/// Stock value held at the product's current average cost.
fn held_value(product: &Product) -> Result<Decimal> {
    in_range(
        product.stock_qty.checked_mul(product.unit_cost),
        "stock value",
    )
}

/// Average cost of `value` spread over `qty`; an empty shelf keeps `fallback`.
fn average(value: Decimal, qty: Decimal, fallback: Decimal) -> Result<Decimal> {
    if qty <= Decimal::ZERO {
        return Ok(fallback);
    }
    Ok(in_range(value.checked_div(qty), "unit cost")?.round_dp(COST_DP))
}

/// Takes `qty` units off the shelf at `cost` per unit.
fn take_stock(tx: &Transaction<'_>, product: &Product, qty: Decimal, cost: Decimal) -> Result<()> {
    let left = in_range(product.stock_qty.checked_sub(qty), "stock quantity")?;
    if left < Decimal::ZERO {
        return Err(short(product, product.stock_qty, qty));
    }
    let out = in_range(qty.checked_mul(cost), "stock value")?;
    let value = in_range(held_value(product)?.checked_sub(out), "stock value")?;
    set_stock(tx, product.id, left, average(value, left, product.unit_cost)?)
}

/// Puts `qty` units back on the shelf at `cost` per unit.
fn return_stock(tx: &Transaction<'_>, product: &Product, qty: Decimal, cost: Decimal) -> Result<()> {
    let total = in_range(product.stock_qty.checked_add(qty), "stock quantity")?;
    let back = in_range(qty.checked_mul(cost), "stock value")?;
    let value = in_range(held_value(product)?.checked_add(back), "stock value")?;
    set_stock(tx, product.id, total, average(value, total, product.unit_cost)?)
}

fn capture_cost(tx: &Transaction<'_>, sale_id: i64, cost: Option<Decimal>) -> Result<()> {
    tx.execute(
        "UPDATE sales SET unit_cost=?1 WHERE id=?2",
        params![cost.map(decimal_value), sale_id],
    )?;
    Ok(())
}

impl Document for Sale {
    const REFERENCE: ReferenceType = ReferenceType::Sale;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn describe(&self) -> String {
        match &self.note {
            Some(n) => format!("Sale #{}: {}", self.id, n),
            None => format!("Sale #{}", self.id),
        }
    }

    /// Removes the units at the captured cost, capturing the product's
    /// current cost on first posting.
    fn settle(&self, tx: &Transaction<'_>) -> Result<()> {
        let Some(pid) = self.product_id else {
            return Ok(());
        };
        let product = Repo::<Product>::new(tx).get(pid)?;
        let cost = self.unit_cost.unwrap_or(product.unit_cost);
        take_stock(tx, &product, self.quantity, cost)?;
        if self.unit_cost.is_none() {
            capture_cost(tx, self.id, Some(cost))?;
        }
        Ok(())
    }

    /// Returns the units at the cost they left with.
    fn unsettle(&self, tx: &Transaction<'_>) -> Result<()> {
        let Some(pid) = self.product_id else {
            return Ok(());
        };
        let product = any_product(tx, pid)?;
        let cost = self.unit_cost.unwrap_or(product.unit_cost);
        return_stock(tx, &product, self.quantity, cost)
    }

    fn resettle(&self, previous: &Self, tx: &Transaction<'_>) -> Result<()> {
        match (previous.product_id, self.product_id) {
            (Some(old), Some(new)) if old == new => {
                let product = Repo::<Product>::new(tx).get(new)?;
                let cost = previous.unit_cost.unwrap_or(product.unit_cost);
                let available = in_range(
                    product.stock_qty.checked_add(previous.quantity),
                    "stock quantity",
                )?;
                if available < self.quantity {
                    return Err(short(&product, available, self.quantity));
                }
                let delta = previous.quantity - self.quantity;
                if delta >= Decimal::ZERO {
                    return_stock(tx, &product, delta, cost)?;
                } else {
                    take_stock(tx, &product, -delta, cost)?;
                }
                capture_cost(tx, self.id, Some(cost))
            }
            _ => {
                previous.unsettle(tx)?;
                capture_cost(tx, self.id, None)?;
                Sale {
                    unit_cost: None,
                    ..self.clone()
                }
                .settle(tx)
            }
        }
    }

    fn journal_lines(&self, conn: &Connection) -> Result<Vec<JournalLine>> {
        let debit = if self.paid { chart::CASH } else { chart::RECEIVABLE };
        let mut lines = vec![JournalLine::new(
            system_account_id(conn, debit)?,
            system_account_id(conn, chart::SALES)?,
            self.amount,
        )];
        if let (Some(_), Some(cost)) = (self.product_id, self.unit_cost) {
            let cogs = in_range(cost.checked_mul(self.quantity), "cost of goods sold")?;
            if cogs > Decimal::ZERO {
                lines.push(JournalLine::new(
                    system_account_id(conn, chart::COGS)?,
                    system_account_id(conn, chart::INVENTORY)?,
                    cogs,
                ));
            }
        }
        Ok(lines)
    }
}

impl Document for Purchase {
    const REFERENCE: ReferenceType = ReferenceType::Purchase;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn describe(&self) -> String {
        match &self.note {
            Some(n) => format!("Purchase #{}: {}", self.id, n),
            None => format!("Purchase #{}", self.id),
        }
    }

    /// Adds stock and moves the product to a weighted average cost.
    fn settle(&self, tx: &Transaction<'_>) -> Result<()> {
        let Some(pid) = self.product_id else {
            return Ok(());
        };
        let product = Repo::<Product>::new(tx).get(pid)?;
        let qty = in_range(product.stock_qty.checked_add(self.quantity), "stock quantity")?;
        let value = in_range(held_value(&product)?.checked_add(self.amount), "stock value")?;
        set_stock(tx, pid, qty, average(value, qty, product.unit_cost)?)
    }

    /// Fails once more units than remain on the shelf have been sold.
    fn unsettle(&self, tx: &Transaction<'_>) -> Result<()> {
        let Some(pid) = self.product_id else {
            return Ok(());
        };
        let product = any_product(tx, pid)?;
        let qty = in_range(product.stock_qty.checked_sub(self.quantity), "stock quantity")?;
        if qty < Decimal::ZERO {
            return Err(short(&product, product.stock_qty, self.quantity));
        }
        let value = in_range(held_value(&product)?.checked_sub(self.amount), "stock value")?;
        set_stock(tx, pid, qty, average(value, qty, product.unit_cost)?)
    }

    /// Same product: applies only the quantity and amount difference, so a
    /// purchase whose units were partly sold can still be corrected.
    fn resettle(&self, previous: &Self, tx: &Transaction<'_>) -> Result<()> {
        match (previous.product_id, self.product_id) {
            (Some(old), Some(new)) if old == new => {
                let product = Repo::<Product>::new(tx).get(new)?;
                let qty = in_range(
                    product
                        .stock_qty
                        .checked_sub(previous.quantity)
                        .and_then(|q| q.checked_add(self.quantity)),
                    "stock quantity",
                )?;
                if qty < Decimal::ZERO {
                    let removed = previous.quantity - self.quantity;
                    return Err(short(&product, product.stock_qty, removed));
                }
                let value = in_range(
                    held_value(&product)?
                        .checked_sub(previous.amount)
                        .and_then(|v| v.checked_add(self.amount)),
                    "stock value",
                )?;
                set_stock(tx, new, qty, average(value, qty, product.unit_cost)?)
            }
            _ => {
                previous.unsettle(tx)?;
                self.settle(tx)
            }
        }
    }

    fn journal_lines(&self, conn: &Connection) -> Result<Vec<JournalLine>> {
        let debit = if self.product_id.is_some() {
            chart::INVENTORY
        } else {
            chart::OPERATING
        };
        let credit = if self.paid { chart::CASH } else { chart::PAYABLE };
        Ok(vec![JournalLine::new(
            system_account_id(conn, debit)?,
            system_account_id(conn, credit)?,
            self.amount,
        )])
    }
}

impl Document for Expense {
    const REFERENCE: ReferenceType = ReferenceType::Expense;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn describe(&self) -> String {
        format!("Expense #{}: {}", self.id, self.payee)
    }

    fn journal_lines(&self, conn: &Connection) -> Result<Vec<JournalLine>> {
        Ok(vec![JournalLine::new(
            self.account_id,
            system_account_id(conn, chart::CASH)?,
            self.amount,
        )])
    }
}

impl Document for Income {
    const REFERENCE: ReferenceType = ReferenceType::Income;

    fn id(&self) -> i64 {
        self.id
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    fn describe(&self) -> String {
        format!("Income #{}: {}", self.id, self.source)
    }

    fn journal_lines(&self, conn: &Connection) -> Result<Vec<JournalLine>> {
        Ok(vec![JournalLine::new(
            system_account_id(conn, chart::CASH)?,
            self.account_id,
            self.amount,
        )])
    }
}
