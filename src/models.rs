// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{BookError, Result};
use crate::repo::{
    Draft, Entity, Repo, date_value, decimal_at, decimal_value, opt_decimal_at, opt_text,
};
use crate::validation::Violations;
use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, Row, ToSql};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! text_enum {
    ($ty:ident, $label:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = BookError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($text => Ok($ty::$variant),)+
                    other => Err(BookError::Validation(format!(
                        "unknown {} '{}'",
                        $label, other
                    ))),
                }
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: BookError| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Asset,
    Liability,
    Equity,
    Revenue,
    Expense,
}

text_enum!(AccountType, "account type", {
    Asset => "asset",
    Liability => "liability",
    Equity => "equity",
    Revenue => "revenue",
    Expense => "expense",
});

impl AccountType {
    /// Asset and expense balances grow on the debit side.
    pub fn debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactKind {
    Customer,
    Supplier,
}

text_enum!(ContactKind, "contact kind", {
    Customer => "customer",
    Supplier => "supplier",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

text_enum!(LeadStatus, "lead status", {
    New => "new",
    Contacted => "contacted",
    Qualified => "qualified",
    Converted => "converted",
    Lost => "lost",
});

/// Business event that produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceType {
    Sale,
    Purchase,
    Expense,
    Income,
    Manual,
}

text_enum!(ReferenceType, "reference type", {
    Sale => "sale",
    Purchase => "purchase",
    Expense => "expense",
    Income => "income",
    Manual => "manual",
});

const NAME_MAX: usize = 120;
const NOTE_MAX: usize = 500;

// ---------------------------------------------------------------------------
// Accounts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub active: bool,
    pub cash: bool,
    pub system: bool,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Account {
    const TABLE: &'static str = "accounts";
    const NAME: &'static str = "Account";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "type",
        "currency",
        "active",
        "cash",
        "system",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "type", "currency"];
    const SORT_FIELDS: &'static [&'static str] = &["name", "type"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Account {
            id: r.get("id")?,
            name: r.get("name")?,
            r#type: r.get("type")?,
            currency: r.get("currency")?,
            active: r.get("active")?,
            cash: r.get("cash")?,
            system: r.get("system")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct AccountDraft {
    pub name: String,
    pub r#type: AccountType,
    pub currency: String,
    pub active: bool,
    pub cash: bool,
}

impl Draft for AccountDraft {
    type Target = Account;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("name", &self.name)
            .max_len("name", &self.name, NAME_MAX)
            .currency("currency", &self.currency)
            .check(
                !self.cash || self.r#type == AccountType::Asset,
                "only asset accounts can be cash accounts",
            );
        v.into_result()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.trim().to_string())),
            ("type", Value::Text(self.r#type.as_str().to_string())),
            ("currency", Value::Text(self.currency.clone())),
            ("active", Value::from(self.active)),
            ("cash", Value::from(self.cash)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Journal

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub reference_type: ReferenceType,
    pub reference_id: i64,
    pub debit_account_id: i64,
    pub credit_account_id: i64,
    pub amount: Decimal,
    pub description: String,
}

impl Entity for JournalEntry {
    const TABLE: &'static str = "journal_entries";
    const NAME: &'static str = "Journal entry";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "reference_type",
        "reference_id",
        "debit_account_id",
        "credit_account_id",
        "amount",
        "description",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["description", "reference_type"];
    const SORT_FIELDS: &'static [&'static str] = &["date", "reference_type"];
    const SOFT_DELETE: bool = false;

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(JournalEntry {
            id: r.get("id")?,
            date: r.get("date")?,
            reference_type: r.get("reference_type")?,
            reference_id: r.get("reference_id")?,
            debit_account_id: r.get("debit_account_id")?,
            credit_account_id: r.get("credit_account_id")?,
            amount: decimal_at(r, "amount")?,
            description: r.get("description")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Contacts

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub kind: ContactKind,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Contact {
    const TABLE: &'static str = "contacts";
    const NAME: &'static str = "Contact";
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "kind", "email", "phone", "created_at", "deleted_at"];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "phone"];
    const SORT_FIELDS: &'static [&'static str] = &["name", "kind"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Contact {
            id: r.get("id")?,
            name: r.get("name")?,
            kind: r.get("kind")?,
            email: r.get("email")?,
            phone: r.get("phone")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ContactDraft {
    pub name: String,
    pub kind: ContactKind,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Draft for ContactDraft {
    type Target = Contact;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("name", &self.name)
            .max_len("name", &self.name, NAME_MAX)
            .email("email", self.email.as_deref());
        v.into_result()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.trim().to_string())),
            ("kind", Value::Text(self.kind.as_str().to_string())),
            ("email", opt_text(self.email.as_deref())),
            ("phone", opt_text(self.phone.as_deref())),
        ]
    }
}

// ---------------------------------------------------------------------------
// Products

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
    /// Weighted average cost, maintained by purchases.
    pub unit_cost: Decimal,
    pub stock_qty: Decimal,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Product {
    const TABLE: &'static str = "products";
    const NAME: &'static str = "Product";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "sku",
        "name",
        "unit_price",
        "unit_cost",
        "stock_qty",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["sku", "name"];
    const SORT_FIELDS: &'static [&'static str] = &["sku", "name"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Product {
            id: r.get("id")?,
            sku: r.get("sku")?,
            name: r.get("name")?,
            unit_price: decimal_at(r, "unit_price")?,
            unit_cost: decimal_at(r, "unit_cost")?,
            stock_qty: decimal_at(r, "stock_qty")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

/// Stock and cost are not editable here; they move with purchases and sales.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub sku: String,
    pub name: String,
    pub unit_price: Decimal,
}

impl Draft for ProductDraft {
    type Target = Product;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("sku", &self.sku)
            .max_len("sku", &self.sku, 40)
            .not_blank("name", &self.name)
            .max_len("name", &self.name, NAME_MAX)
            .non_negative("unit_price", self.unit_price);
        v.into_result()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("sku", Value::Text(self.sku.trim().to_string())),
            ("name", Value::Text(self.name.trim().to_string())),
            ("unit_price", decimal_value(self.unit_price)),
        ]
    }
}

// ---------------------------------------------------------------------------
// Documents: sales, purchases, expenses, incomes

fn require_contact(conn: &Connection, id: Option<i64>, kind: ContactKind) -> Result<()> {
    if let Some(id) = id {
        let contact = Repo::<Contact>::new(conn).get(id)?;
        if contact.kind != kind {
            return Err(BookError::Validation(format!(
                "contact '{}' is not a {}",
                contact.name, kind
            )));
        }
    }
    Ok(())
}

fn require_account(conn: &Connection, id: i64, typ: AccountType) -> Result<()> {
    let account = Repo::<Account>::new(conn).get(id)?;
    if account.r#type != typ {
        return Err(BookError::Validation(format!(
            "account '{}' is a {} account, expected {}",
            account.name, account.r#type, typ
        )));
    }
    if !account.active {
        return Err(BookError::Validation(format!(
            "account '{}' is inactive",
            account.name
        )));
    }
    Ok(())
}

fn check_note(v: &mut Violations, note: Option<&str>) {
    if let Some(n) = note {
        v.max_len("note", n, NOTE_MAX);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub date: NaiveDate,
    pub contact_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Decimal,
    pub amount: Decimal,
    /// Product cost per unit captured the first time the sale was posted.
    /// Kept across amends of the same product and across discard/reinstate.
    pub unit_cost: Option<Decimal>,
    pub paid: bool,
    pub note: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Sale {
    const TABLE: &'static str = "sales";
    const NAME: &'static str = "Sale";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "contact_id",
        "product_id",
        "quantity",
        "amount",
        "unit_cost",
        "paid",
        "note",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["note", "date"];
    const SORT_FIELDS: &'static [&'static str] = &["date"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Sale {
            id: r.get("id")?,
            date: r.get("date")?,
            contact_id: r.get("contact_id")?,
            product_id: r.get("product_id")?,
            quantity: decimal_at(r, "quantity")?,
            amount: decimal_at(r, "amount")?,
            unit_cost: opt_decimal_at(r, "unit_cost")?,
            paid: r.get("paid")?,
            note: r.get("note")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct SaleDraft {
    pub date: NaiveDate,
    pub contact_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub paid: bool,
    pub note: Option<String>,
}

impl Draft for SaleDraft {
    type Target = Sale;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.positive("amount", self.amount)
            .positive("quantity", self.quantity)
            .check(
                self.paid || self.contact_id.is_some(),
                "credit sales need a customer",
            );
        check_note(&mut v, self.note.as_deref());
        v.into_result()
    }

    fn check_references(&self, conn: &Connection) -> Result<()> {
        require_contact(conn, self.contact_id, ContactKind::Customer)?;
        if let Some(pid) = self.product_id {
            Repo::<Product>::new(conn).get(pid)?;
        }
        Ok(())
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("date", date_value(self.date)),
            ("contact_id", Value::from(self.contact_id)),
            ("product_id", Value::from(self.product_id)),
            ("quantity", decimal_value(self.quantity)),
            ("amount", decimal_value(self.amount)),
            ("paid", Value::from(self.paid)),
            ("note", opt_text(self.note.as_deref())),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i64,
    pub date: NaiveDate,
    pub contact_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub paid: bool,
    pub note: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Purchase {
    const TABLE: &'static str = "purchases";
    const NAME: &'static str = "Purchase";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "contact_id",
        "product_id",
        "quantity",
        "amount",
        "paid",
        "note",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["note", "date"];
    const SORT_FIELDS: &'static [&'static str] = &["date"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Purchase {
            id: r.get("id")?,
            date: r.get("date")?,
            contact_id: r.get("contact_id")?,
            product_id: r.get("product_id")?,
            quantity: decimal_at(r, "quantity")?,
            amount: decimal_at(r, "amount")?,
            paid: r.get("paid")?,
            note: r.get("note")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

impl Purchase {
    /// Zero when the quotient has no representation.
    pub fn unit_cost(&self) -> Decimal {
        self.amount.checked_div(self.quantity).unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct PurchaseDraft {
    pub date: NaiveDate,
    pub contact_id: Option<i64>,
    pub product_id: Option<i64>,
    pub quantity: Decimal,
    pub amount: Decimal,
    pub paid: bool,
    pub note: Option<String>,
}

impl Draft for PurchaseDraft {
    type Target = Purchase;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.positive("amount", self.amount)
            .positive("quantity", self.quantity)
            .check(
                self.paid || self.contact_id.is_some(),
                "purchases on credit need a supplier",
            );
        check_note(&mut v, self.note.as_deref());
        v.into_result()
    }

    fn check_references(&self, conn: &Connection) -> Result<()> {
        require_contact(conn, self.contact_id, ContactKind::Supplier)?;
        if let Some(pid) = self.product_id {
            Repo::<Product>::new(conn).get(pid)?;
        }
        Ok(())
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("date", date_value(self.date)),
            ("contact_id", Value::from(self.contact_id)),
            ("product_id", Value::from(self.product_id)),
            ("quantity", decimal_value(self.quantity)),
            ("amount", decimal_value(self.amount)),
            ("paid", Value::from(self.paid)),
            ("note", opt_text(self.note.as_deref())),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub payee: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Expense {
    const TABLE: &'static str = "expenses";
    const NAME: &'static str = "Expense";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "account_id",
        "payee",
        "amount",
        "note",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["payee", "note"];
    const SORT_FIELDS: &'static [&'static str] = &["date", "payee"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Expense {
            id: r.get("id")?,
            date: r.get("date")?,
            account_id: r.get("account_id")?,
            payee: r.get("payee")?,
            amount: decimal_at(r, "amount")?,
            note: r.get("note")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub account_id: i64,
    pub payee: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl Draft for ExpenseDraft {
    type Target = Expense;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("payee", &self.payee)
            .max_len("payee", &self.payee, NAME_MAX)
            .positive("amount", self.amount);
        check_note(&mut v, self.note.as_deref());
        v.into_result()
    }

    fn check_references(&self, conn: &Connection) -> Result<()> {
        require_account(conn, self.account_id, AccountType::Expense)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("date", date_value(self.date)),
            ("account_id", Value::Integer(self.account_id)),
            ("payee", Value::Text(self.payee.trim().to_string())),
            ("amount", decimal_value(self.amount)),
            ("note", opt_text(self.note.as_deref())),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Income {
    pub id: i64,
    pub date: NaiveDate,
    pub account_id: i64,
    pub source: String,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Income {
    const TABLE: &'static str = "incomes";
    const NAME: &'static str = "Income";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "date",
        "account_id",
        "source",
        "amount",
        "note",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["source", "note"];
    const SORT_FIELDS: &'static [&'static str] = &["date", "source"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Income {
            id: r.get("id")?,
            date: r.get("date")?,
            account_id: r.get("account_id")?,
            source: r.get("source")?,
            amount: decimal_at(r, "amount")?,
            note: r.get("note")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct IncomeDraft {
    pub date: NaiveDate,
    pub account_id: i64,
    pub source: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

impl Draft for IncomeDraft {
    type Target = Income;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("source", &self.source)
            .max_len("source", &self.source, NAME_MAX)
            .positive("amount", self.amount);
        check_note(&mut v, self.note.as_deref());
        v.into_result()
    }

    fn check_references(&self, conn: &Connection) -> Result<()> {
        require_account(conn, self.account_id, AccountType::Revenue)
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("date", date_value(self.date)),
            ("account_id", Value::Integer(self.account_id)),
            ("source", Value::Text(self.source.trim().to_string())),
            ("amount", decimal_value(self.amount)),
            ("note", opt_text(self.note.as_deref())),
        ]
    }
}

// ---------------------------------------------------------------------------
// CRM

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: LeadStatus,
    pub contact_id: Option<i64>,
    pub converted_at: Option<String>,
    pub created_at: String,
    pub deleted_at: Option<String>,
}

impl Entity for Lead {
    const TABLE: &'static str = "leads";
    const NAME: &'static str = "Lead";
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "email",
        "company",
        "status",
        "contact_id",
        "converted_at",
        "created_at",
        "deleted_at",
    ];
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "company"];
    const SORT_FIELDS: &'static [&'static str] = &["name", "status"];

    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Lead {
            id: r.get("id")?,
            name: r.get("name")?,
            email: r.get("email")?,
            company: r.get("company")?,
            status: r.get("status")?,
            contact_id: r.get("contact_id")?,
            converted_at: r.get("converted_at")?,
            created_at: r.get("created_at")?,
            deleted_at: r.get("deleted_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct LeadDraft {
    pub name: String,
    pub email: Option<String>,
    pub company: Option<String>,
    pub status: LeadStatus,
}

impl Draft for LeadDraft {
    type Target = Lead;

    fn validate(&self) -> Result<()> {
        let mut v = Violations::new();
        v.not_blank("name", &self.name)
            .max_len("name", &self.name, NAME_MAX)
            .email("email", self.email.as_deref())
            .check(
                self.status != LeadStatus::Converted,
                "status 'converted' is only set by converting the lead",
            );
        v.into_result()
    }

    fn values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("name", Value::Text(self.name.trim().to_string())),
            ("email", opt_text(self.email.as_deref())),
            ("company", opt_text(self.company.as_deref())),
            ("status", Value::Text(self.status.as_str().to_string())),
        ]
    }
}
