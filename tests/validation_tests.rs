// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tillbook::error::BookError;
use tillbook::models::{AccountDraft, AccountType, LeadDraft, LeadStatus, SaleDraft};
use tillbook::repo::Draft;
use tillbook::validation::Violations;

fn message(err: BookError) -> String {
    match err {
        BookError::Validation(msg) => msg,
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn all_violations_are_reported_together() {
    let mut v = Violations::new();
    v.not_blank("name", "  ")
        .positive("amount", Decimal::ZERO)
        .currency("currency", "usd");
    let msg = message(v.into_result().unwrap_err());
    assert_eq!(
        msg,
        "name must not be empty; amount must be positive; currency must be a 3-letter ISO code, got 'usd'"
    );
}

#[test]
fn clean_draft_passes() {
    let mut v = Violations::new();
    v.not_blank("name", "Till")
        .max_len("name", "Till", 10)
        .non_negative("price", Decimal::ZERO)
        .email("email", Some("a@b.io"))
        .email("email", None);
    assert!(v.into_result().is_ok());
}

#[test]
fn email_shape_is_checked() {
    for bad in ["nobody", "@x.com", "a@com", "a@.com"] {
        let mut v = Violations::new();
        v.email("email", Some(bad));
        assert!(v.into_result().is_err(), "{} should be rejected", bad);
    }
}

#[test]
fn account_draft_rejects_cash_flag_off_assets() {
    let draft = AccountDraft {
        name: "Sales".into(),
        r#type: AccountType::Revenue,
        currency: "USD".into(),
        active: true,
        cash: true,
    };
    assert!(matches!(draft.validate(), Err(BookError::Validation(_))));
}

#[test]
fn credit_sale_needs_a_customer() {
    let draft = SaleDraft {
        date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        contact_id: None,
        product_id: None,
        quantity: Decimal::ONE,
        amount: Decimal::new(1000, 2),
        paid: false,
        note: None,
    };
    let msg = message(draft.validate().unwrap_err());
    assert!(msg.contains("credit sales need a customer"));
}

#[test]
fn lead_status_converted_cannot_be_set_directly() {
    let draft = LeadDraft {
        name: "Prospect".into(),
        email: None,
        company: None,
        status: LeadStatus::Converted,
    };
    assert!(matches!(draft.validate(), Err(BookError::Validation(_))));
}

#[test]
fn unknown_enum_text_is_a_validation_error() {
    let err = "bank".parse::<AccountType>().unwrap_err();
    assert_eq!(message(err), "unknown account type 'bank'");
    assert_eq!(" Asset ".parse::<AccountType>().unwrap(), AccountType::Asset);
}
