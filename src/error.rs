// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    /// Flattened list of every violated rule, joined with "; ".
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced { debits: Decimal, credits: Decimal },

    #[error("Insufficient stock for '{sku}': {available} available, {requested} requested")]
    InsufficientStock {
        sku: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Lead is already converted")]
    AlreadyConverted,

    #[error("Ledger integrity error: {0}")]
    Integrity(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl BookError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        BookError::NotFound { entity, id }
    }

    /// Maps UNIQUE/CHECK/FOREIGN KEY failures to `Conflict`, everything else passes through.
    pub fn from_write(err: rusqlite::Error, what: &str) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(e, ref msg)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                let detail = msg.clone().unwrap_or_else(|| e.to_string());
                BookError::Conflict(format!("{}: {}", what, detail))
            }
            other => BookError::Sqlite(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BookError>;
