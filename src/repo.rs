// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Generic table access shared by every record type.
//!
//! An [`Entity`] describes its table, column list and the fields that take
//! part in free-text search; a [`Draft`] is the validated create/update
//! payload for one entity. [`Repo`] composes pagination, search, sorting and
//! soft-delete on top of those two descriptions.

use crate::error::{BookError, Result};
use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Row, params, params_from_iter};
use rust_decimal::Decimal;
use serde::Serialize;
use std::marker::PhantomData;
use tracing::debug;

pub trait Entity: Sized {
    const TABLE: &'static str;
    /// Human name used in error messages.
    const NAME: &'static str;
    /// Select list; `from_row` reads these by name.
    const COLUMNS: &'static [&'static str];
    const SEARCH_FIELDS: &'static [&'static str];
    /// Extra sortable columns besides `id` and `created_at`.
    const SORT_FIELDS: &'static [&'static str];
    const SOFT_DELETE: bool = true;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

pub trait Draft {
    type Target: Entity;

    fn validate(&self) -> Result<()>;

    /// Checks that referenced rows exist and are usable.
    fn check_references(&self, _conn: &Connection) -> Result<()> {
        Ok(())
    }

    /// Column/value pairs written on both insert and update.
    fn values(&self) -> Vec<(&'static str, Value)>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Active,
    Deleted,
    All,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: SortOrder,
    pub scope: Scope,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            sort: None,
            order: SortOrder::Desc,
            scope: Scope::Active,
        }
    }
}

impl ListQuery {
    pub fn with_search(mut self, term: &str) -> Self {
        self.search = Some(term.to_string());
        self
    }

    pub fn paged(mut self, page: u32, limit: u32) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    pub fn scoped(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

pub struct Repo<'c, E> {
    conn: &'c Connection,
    _entity: PhantomData<E>,
}

impl<'c, E: Entity> Repo<'c, E> {
    pub fn new(conn: &'c Connection) -> Self {
        Self {
            conn,
            _entity: PhantomData,
        }
    }

    fn select() -> String {
        format!("SELECT {} FROM {}", E::COLUMNS.join(", "), E::TABLE)
    }

    fn scope_clause(scope: Scope) -> &'static str {
        if !E::SOFT_DELETE {
            return "1=1";
        }
        match scope {
            Scope::Active => "deleted_at IS NULL",
            Scope::Deleted => "deleted_at IS NOT NULL",
            Scope::All => "1=1",
        }
    }

    fn require_soft_delete(&self) -> Result<()> {
        if E::SOFT_DELETE {
            Ok(())
        } else {
            Err(BookError::Validation(format!(
                "{} records cannot be soft-deleted",
                E::NAME
            )))
        }
    }

    pub fn create<D: Draft<Target = E>>(&self, draft: &D) -> Result<E> {
        draft.validate()?;
        draft.check_references(self.conn)?;
        let values = draft.values();
        let cols: Vec<&str> = values.iter().map(|(c, _)| *c).collect();
        let marks = vec!["?"; cols.len()].join(", ");
        let sql = format!(
            "INSERT INTO {}({}) VALUES ({})",
            E::TABLE,
            cols.join(", "),
            marks
        );
        self.conn
            .execute(&sql, params_from_iter(values.into_iter().map(|(_, v)| v)))
            .map_err(|e| BookError::from_write(e, E::NAME))?;
        let id = self.conn.last_insert_rowid();
        debug!(table = E::TABLE, id, "inserted");
        self.get_in(id, Scope::All)
    }

    /// Any row with this id, deleted or not.
    pub fn find(&self, id: i64) -> Result<Option<E>> {
        let sql = format!("{} WHERE id=?1", Self::select());
        let found = self
            .conn
            .query_row(&sql, params![id], |r| E::from_row(r))
            .optional()?;
        Ok(found)
    }

    /// Active row with this id.
    pub fn get(&self, id: i64) -> Result<E> {
        self.get_in(id, Scope::Active)
    }

    pub fn get_in(&self, id: i64, scope: Scope) -> Result<E> {
        let sql = format!(
            "{} WHERE id=?1 AND {}",
            Self::select(),
            Self::scope_clause(scope)
        );
        self.conn
            .query_row(&sql, params![id], |r| E::from_row(r))
            .optional()?
            .ok_or_else(|| BookError::not_found(E::NAME, id))
    }

    pub fn find_all(&self, q: &ListQuery) -> Result<Page<E>> {
        self.find_all_where(q, "1=1", Vec::new())
    }

    /// `find_all` narrowed by an extra caller-built condition.
    pub fn find_all_where(&self, q: &ListQuery, extra: &str, extra_args: Vec<Value>) -> Result<Page<E>> {
        if q.page == 0 || q.limit == 0 {
            return Err(BookError::Validation(
                "page and limit must be greater than zero".into(),
            ));
        }
        if q.scope == Scope::Deleted && !E::SOFT_DELETE {
            return Err(BookError::Validation(format!(
                "{} records are never soft-deleted",
                E::NAME
            )));
        }
        let sort = match q.sort.as_deref() {
            None => "created_at",
            Some(s) if s == "id" || s == "created_at" || E::SORT_FIELDS.iter().any(|f| *f == s) => s,
            Some(s) => {
                return Err(BookError::Validation(format!(
                    "cannot sort {} by '{}'",
                    E::NAME,
                    s
                )));
            }
        };

        let mut clause = format!("{} AND ({})", Self::scope_clause(q.scope), extra);
        let mut args: Vec<Value> = extra_args;
        if let Some(term) = q.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            let ors: Vec<String> = E::SEARCH_FIELDS
                .iter()
                .map(|f| format!("LOWER(COALESCE({}, '')) LIKE ? ESCAPE '\\'", f))
                .collect();
            if !ors.is_empty() {
                clause.push_str(&format!(" AND ({})", ors.join(" OR ")));
                for _ in E::SEARCH_FIELDS {
                    args.push(Value::Text(pattern.clone()));
                }
            }
        }

        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE {}", E::TABLE, clause);
        let total: i64 = self
            .conn
            .query_row(&count_sql, params_from_iter(args.iter()), |r| r.get(0))?;
        let total = total as u64;

        let dir = q.order.sql();
        let sql = format!(
            "{} WHERE {} ORDER BY {} {}, id {} LIMIT ? OFFSET ?",
            Self::select(),
            clause,
            sort,
            dir,
            dir
        );
        let offset = (q.page as i64 - 1) * q.limit as i64;
        args.push(Value::Integer(q.limit as i64));
        args.push(Value::Integer(offset));
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |r| E::from_row(r))?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        debug!(table = E::TABLE, total, page = q.page, "listed");

        Ok(Page {
            data,
            total,
            page: q.page,
            limit: q.limit,
            total_pages: total.div_ceil(q.limit as u64),
        })
    }

    /// Unpaginated fetch with a caller-built WHERE clause.
    pub fn find_where(&self, clause: &str, args: &[Value], order_by: &str) -> Result<Vec<E>> {
        let sql = format!("{} WHERE {} ORDER BY {}", Self::select(), clause, order_by);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args.iter()), |r| E::from_row(r))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn update<D: Draft<Target = E>>(&self, id: i64, draft: &D) -> Result<E> {
        draft.validate()?;
        draft.check_references(self.conn)?;
        let values = draft.values();
        let sets: Vec<String> = values.iter().map(|(c, _)| format!("{}=?", c)).collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at=datetime('now') WHERE id=? AND {}",
            E::TABLE,
            sets.join(", "),
            Self::scope_clause(Scope::Active)
        );
        let mut args: Vec<Value> = values.into_iter().map(|(_, v)| v).collect();
        args.push(Value::Integer(id));
        let n = self
            .conn
            .execute(&sql, params_from_iter(args))
            .map_err(|e| BookError::from_write(e, E::NAME))?;
        if n == 0 {
            return Err(BookError::not_found(E::NAME, id));
        }
        debug!(table = E::TABLE, id, "updated");
        self.get(id)
    }

    pub fn soft_delete(&self, id: i64) -> Result<()> {
        self.require_soft_delete()?;
        let sql = format!(
            "UPDATE {} SET deleted_at=datetime('now') WHERE id=?1 AND deleted_at IS NULL",
            E::TABLE
        );
        if self.conn.execute(&sql, params![id])? == 0 {
            return Err(BookError::not_found(E::NAME, id));
        }
        debug!(table = E::TABLE, id, "soft-deleted");
        Ok(())
    }

    pub fn restore(&self, id: i64) -> Result<E> {
        self.require_soft_delete()?;
        let sql = format!(
            "UPDATE {} SET deleted_at=NULL, updated_at=datetime('now') WHERE id=?1 AND deleted_at IS NOT NULL",
            E::TABLE
        );
        if self.conn.execute(&sql, params![id])? == 0 {
            return Err(BookError::not_found(E::NAME, id));
        }
        debug!(table = E::TABLE, id, "restored");
        self.get(id)
    }

    pub fn hard_delete(&self, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id=?1", E::TABLE);
        let n = self
            .conn
            .execute(&sql, params![id])
            .map_err(|e| BookError::from_write(e, E::NAME))?;
        if n == 0 {
            return Err(BookError::not_found(E::NAME, id));
        }
        debug!(table = E::TABLE, id, "hard-deleted");
        Ok(())
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub fn decimal_value(d: Decimal) -> Value {
    Value::Text(d.to_string())
}

pub fn date_value(d: NaiveDate) -> Value {
    Value::Text(d.to_string())
}

pub fn opt_text(s: Option<&str>) -> Value {
    match s {
        Some(v) => Value::Text(v.to_string()),
        None => Value::Null,
    }
}

/// Reads a TEXT-stored decimal column.
pub fn decimal_at(row: &Row<'_>, col: &str) -> rusqlite::Result<Decimal> {
    let raw: String = row.get(col)?;
    parse_column(row, col, &raw)
}

pub fn opt_decimal_at(row: &Row<'_>, col: &str) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(col)?;
    raw.map(|r| parse_column(row, col, &r)).transpose()
}

fn parse_column(row: &Row<'_>, col: &str, raw: &str) -> rusqlite::Result<Decimal> {
    raw.trim().parse::<Decimal>().map_err(|e| {
        let idx = row.as_ref().column_index(col).unwrap_or(0);
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
