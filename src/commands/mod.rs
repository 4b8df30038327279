// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod contacts;
pub mod products;
pub mod sales;
pub mod purchases;
pub mod expenses;
pub mod incomes;
pub mod journal;
pub mod reports;
pub mod leads;
pub mod settings;
pub mod doctor;

use crate::repo::{ListQuery, Page, Scope, SortOrder};
use crate::utils::{maybe_print_json, money_table, parse_date};
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

pub fn list_query(sub: &clap::ArgMatches) -> ListQuery {
    let flag = |name: &str| matches!(sub.try_get_one::<bool>(name), Ok(Some(true)));
    let scope = if flag("deleted") {
        Scope::Deleted
    } else if flag("all") {
        Scope::All
    } else {
        Scope::Active
    };
    let order = match sub.get_one::<String>("order").map(String::as_str) {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    };
    ListQuery {
        page: *sub.get_one::<u32>("page").unwrap_or(&1),
        limit: *sub.get_one::<u32>("limit").unwrap_or(&20),
        search: sub.get_one::<String>("search").cloned(),
        sort: sub.get_one::<String>("sort").cloned(),
        order,
        scope,
    }
}

pub fn opt_date(sub: &clap::ArgMatches, key: &str) -> Result<Option<NaiveDate>> {
    sub.get_one::<String>(key).map(|s| parse_date(s)).transpose()
}

/// `--date` or today.
pub fn date_or_today(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    Ok(opt_date(sub, "date")?.unwrap_or_else(|| chrono::Local::now().date_naive()))
}

pub fn opt_string(sub: &clap::ArgMatches, key: &str) -> Option<String> {
    sub.get_one::<String>(key)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

pub fn required_id(sub: &clap::ArgMatches) -> i64 {
    *sub.get_one::<i64>("id").unwrap()
}

/// Prints a page as JSON or as a table followed by a page footer.
pub fn print_page<T, F>(
    sub: &clap::ArgMatches,
    page: &Page<T>,
    headers: &[&str],
    numeric: &[usize],
    row: F,
) -> Result<()>
where
    T: Serialize,
    F: Fn(&T) -> Vec<String>,
{
    // jsonl streams the records themselves, json keeps the paging envelope
    if sub.get_flag("jsonl") {
        maybe_print_json(false, true, &page.data)?;
        return Ok(());
    }
    if maybe_print_json(sub.get_flag("json"), false, page)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = page.data.iter().map(row).collect();
    println!("{}", money_table(headers, numeric, rows));
    println!(
        "page {}/{} ({} total)",
        page.page,
        page.total_pages.max(1),
        page.total
    );
    Ok(())
}
