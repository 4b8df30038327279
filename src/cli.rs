// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print one JSON object per line"),
    ]
}

fn list_cmd() -> Command {
    Command::new("list")
        .about("List records, newest first")
        .arg(
            Arg::new("page")
                .long("page")
                .value_parser(value_parser!(u32))
                .default_value("1"),
        )
        .arg(
            Arg::new("limit")
                .long("limit")
                .value_parser(value_parser!(u32))
                .default_value("20"),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .short('s')
                .help("Case-insensitive substring match"),
        )
        .arg(Arg::new("sort").long("sort").help("Sort column"))
        .arg(
            Arg::new("order")
                .long("order")
                .value_parser(["asc", "desc"])
                .default_value("desc"),
        )
        .args(json_args())
}

/// `list` for records that can be soft-deleted.
fn scoped_list_cmd() -> Command {
    list_cmd()
        .arg(
            Arg::new("deleted")
                .long("deleted")
                .action(ArgAction::SetTrue)
                .conflicts_with("all")
                .help("Only soft-deleted records"),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Include soft-deleted records"),
        )
}

fn id_cmd(name: &'static str, about: &'static str) -> Command {
    Command::new(name).about(about).arg(
        Arg::new("id")
            .required(true)
            .value_parser(value_parser!(i64)),
    )
}

/// list / rm / restore / purge, shared by every record type.
fn with_record_ops(cmd: Command) -> Command {
    cmd.subcommand(scoped_list_cmd())
        .subcommand(id_cmd("rm", "Soft-delete a record"))
        .subcommand(id_cmd("restore", "Restore a soft-deleted record"))
        .subcommand(id_cmd("purge", "Delete a record permanently"))
}

fn with_id(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("id")
            .required(true)
            .value_parser(value_parser!(i64)),
    )
}

fn date_arg(required: bool) -> Arg {
    Arg::new("date")
        .long("date")
        .required(required)
        .help("YYYY-MM-DD (defaults to today)")
}

fn note_arg() -> Arg {
    Arg::new("note").long("note")
}

fn account_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("name").long("name").required(true))
        .arg(
            Arg::new("type")
                .long("type")
                .required(true)
                .value_parser(["asset", "liability", "equity", "revenue", "expense"]),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .help("Defaults to the base currency"),
        )
        .arg(
            Arg::new("cash")
                .long("cash")
                .action(ArgAction::SetTrue)
                .help("Count toward the cash-flow report"),
        )
        .arg(
            Arg::new("inactive")
                .long("inactive")
                .action(ArgAction::SetTrue),
        )
}

fn contact_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("name").long("name").required(true))
        .arg(
            Arg::new("kind")
                .long("kind")
                .required(true)
                .value_parser(["customer", "supplier"]),
        )
        .arg(Arg::new("email").long("email"))
        .arg(Arg::new("phone").long("phone"))
}

fn product_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("sku").long("sku").required(true))
        .arg(Arg::new("name").long("name").required(true))
        .arg(Arg::new("price").long("price").default_value("0"))
}

fn sale_fields(cmd: Command) -> Command {
    cmd.arg(date_arg(false))
        .arg(
            Arg::new("customer")
                .long("customer")
                .value_parser(value_parser!(i64))
                .help("Customer contact id"),
        )
        .arg(Arg::new("product").long("product").help("Product SKU"))
        .arg(Arg::new("quantity").long("qty").default_value("1"))
        .arg(
            Arg::new("amount")
                .long("amount")
                .help("Defaults to unit price x quantity"),
        )
        .arg(
            Arg::new("credit")
                .long("credit")
                .action(ArgAction::SetTrue)
                .help("Unpaid: post to Accounts Receivable"),
        )
        .arg(note_arg())
}

fn purchase_fields(cmd: Command) -> Command {
    cmd.arg(date_arg(false))
        .arg(
            Arg::new("supplier")
                .long("supplier")
                .value_parser(value_parser!(i64))
                .help("Supplier contact id"),
        )
        .arg(Arg::new("product").long("product").help("Product SKU"))
        .arg(Arg::new("quantity").long("qty").default_value("1"))
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(
            Arg::new("credit")
                .long("credit")
                .action(ArgAction::SetTrue)
                .help("Unpaid: post to Accounts Payable"),
        )
        .arg(note_arg())
}

fn expense_fields(cmd: Command) -> Command {
    cmd.arg(date_arg(false))
        .arg(
            Arg::new("account")
                .long("account")
                .default_value("Operating Expenses"),
        )
        .arg(Arg::new("payee").long("payee").required(true))
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(note_arg())
}

fn income_fields(cmd: Command) -> Command {
    cmd.arg(date_arg(false))
        .arg(
            Arg::new("account")
                .long("account")
                .default_value("Other Income"),
        )
        .arg(Arg::new("source").long("source").required(true))
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(note_arg())
}

fn lead_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("name").long("name").required(true))
        .arg(Arg::new("email").long("email"))
        .arg(Arg::new("company").long("company"))
        .arg(
            Arg::new("status")
                .long("status")
                .value_parser(["new", "contacted", "qualified", "lost"])
                .default_value("new"),
        )
}

fn range_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("from").long("from").help("YYYY-MM-DD, inclusive"))
        .arg(Arg::new("to").long("to").help("YYYY-MM-DD, inclusive"))
        .args(json_args())
}

fn as_of_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("as_of").long("as-of").help("YYYY-MM-DD, inclusive"))
        .args(json_args())
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .about("Double-entry bookkeeping for small businesses")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .env("TILLBOOK_DB")
                .help("Database file (defaults to the platform data dir)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count),
        )
        .subcommand(Command::new("init").about("Create the database and chart of accounts"))
        .subcommand(
            Command::new("settings")
                .about("Book settings")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set-currency")
                        .arg(Arg::new("currency").required(true)),
                )
                .subcommand(Command::new("set-company").arg(Arg::new("name").required(true))),
        )
        .subcommand(with_record_ops(
            Command::new("account")
                .about("Chart of accounts")
                .subcommand(account_fields(Command::new("add")))
                .subcommand(account_fields(with_id(Command::new("update")))),
        ))
        .subcommand(with_record_ops(
            Command::new("contact")
                .about("Customers and suppliers")
                .subcommand(contact_fields(Command::new("add")))
                .subcommand(contact_fields(with_id(Command::new("update")))),
        ))
        .subcommand(with_record_ops(
            Command::new("product")
                .about("Products and stock")
                .subcommand(product_fields(Command::new("add")))
                .subcommand(product_fields(with_id(Command::new("update")))),
        ))
        .subcommand(with_record_ops(
            Command::new("sale")
                .about("Sales")
                .subcommand(sale_fields(Command::new("add")))
                .subcommand(sale_fields(with_id(Command::new("update"))))
                .subcommand(id_cmd("show", "Show a sale and its journal rows")),
        ))
        .subcommand(with_record_ops(
            Command::new("purchase")
                .about("Purchases")
                .subcommand(purchase_fields(Command::new("add")))
                .subcommand(purchase_fields(with_id(Command::new("update"))))
                .subcommand(id_cmd("show", "Show a purchase and its journal rows")),
        ))
        .subcommand(with_record_ops(
            Command::new("expense")
                .about("Expenses paid from cash")
                .subcommand(expense_fields(Command::new("add")))
                .subcommand(expense_fields(with_id(Command::new("update"))))
                .subcommand(id_cmd("show", "Show an expense and its journal rows")),
        ))
        .subcommand(with_record_ops(
            Command::new("income")
                .about("Other income received in cash")
                .subcommand(income_fields(Command::new("add")))
                .subcommand(income_fields(with_id(Command::new("update"))))
                .subcommand(id_cmd("show", "Show an income and its journal rows")),
        ))
        .subcommand(
            Command::new("journal")
                .about("General journal")
                .subcommand(
                    Command::new("post")
                        .about("Post a balanced compound entry")
                        .arg(date_arg(false))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(
                            Arg::new("debit")
                                .long("debit")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("ACCOUNT=AMOUNT, repeatable"),
                        )
                        .arg(
                            Arg::new("credit")
                                .long("credit")
                                .action(ArgAction::Append)
                                .required(true)
                                .help("ACCOUNT=AMOUNT, repeatable"),
                        ),
                )
                .subcommand(
                    list_cmd()
                        .arg(Arg::new("from").long("from"))
                        .arg(Arg::new("to").long("to"))
                        .arg(Arg::new("account").long("account")),
                )
                .subcommand(id_cmd("void", "Remove a manual entry group by reference id")),
        )
        .subcommand(
            Command::new("report")
                .about("Ledger reports")
                .subcommand(as_of_args(Command::new("trial-balance")))
                .subcommand(range_args(Command::new("pnl").about("Profit and loss")))
                .subcommand(as_of_args(Command::new("balance-sheet")))
                .subcommand(range_args(Command::new("cash-flow")))
                .subcommand(range_args(
                    Command::new("statement")
                        .about("Entries and running balance of one account")
                        .arg(Arg::new("account").long("account").required(true)),
                )),
        )
        .subcommand(with_record_ops(
            Command::new("lead")
                .about("Sales leads")
                .subcommand(lead_fields(Command::new("add")))
                .subcommand(lead_fields(with_id(Command::new("update"))))
                .subcommand(id_cmd("convert", "Convert a lead into a customer")),
        ))
        .subcommand(Command::new("doctor").about("Check ledger consistency"))
}
