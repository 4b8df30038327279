// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Declarative checks for create/update drafts.
//!
//! Every check records a message instead of failing fast, so a draft with
//! several problems reports all of them in a single flat error.

use crate::error::{BookError, Result};
use rust_decimal::Decimal;

#[derive(Debug, Default)]
pub struct Violations {
    messages: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    pub fn check(&mut self, ok: bool, msg: impl Into<String>) -> &mut Self {
        if !ok {
            self.push(msg);
        }
        self
    }

    pub fn not_blank(&mut self, field: &str, value: &str) -> &mut Self {
        self.check(!value.trim().is_empty(), format!("{} must not be empty", field))
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) -> &mut Self {
        self.check(
            value.chars().count() <= max,
            format!("{} must be at most {} characters", field, max),
        )
    }

    pub fn positive(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(value > Decimal::ZERO, format!("{} must be positive", field))
    }

    pub fn non_negative(&mut self, field: &str, value: Decimal) -> &mut Self {
        self.check(
            value >= Decimal::ZERO,
            format!("{} must not be negative", field),
        )
    }

    pub fn currency(&mut self, field: &str, value: &str) -> &mut Self {
        let ok = value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase());
        self.check(
            ok,
            format!("{} must be a 3-letter ISO code, got '{}'", field, value),
        )
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            let ok = match v.split_once('@') {
                Some((local, domain)) => {
                    !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
                }
                None => false,
            };
            self.check(ok, format!("{} '{}' is not a valid email", field, v));
        }
        self
    }

    pub fn into_result(self) -> Result<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(BookError::Validation(self.messages.join("; ")))
        }
    }
}

/// Turns an overflowed `checked_*` result into a validation error.
pub fn in_range(value: Option<Decimal>, what: &str) -> Result<Decimal> {
    value.ok_or_else(|| BookError::Validation(format!("{} is out of range", what)))
}
