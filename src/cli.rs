// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tallybook")
        .about("Personal finance and peer-to-peer lending ledger")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("profile")
                .about("Manage local profiles")
                .subcommand(
                    Command::new("add")
                        .about("Create a profile")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(Command::new("list").about("List profiles"))
                .subcommand(
                    Command::new("use")
                        .about("Select the active profile")
                        .arg(Arg::new("name").required(true)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a profile and everything it owns")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and inspect ledger entries")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(
                            Arg::new("kind")
                                .long("kind")
                                .required(true)
                                .help("income|expense|investment"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .required(true)
                                .help("Payment method, e.g. cash, bank, upi"),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, defaults to today"),
                        )
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(Arg::new("kind").long("kind"))
                        .arg(Arg::new("method").long("method"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction (and its loan, if linked)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("loan")
                .about("Track money lent and borrowed")
                .subcommand(
                    Command::new("add")
                        .about("Record a loan; writes the principal ledger entry")
                        .arg(Arg::new("person").long("person").required(true))
                        .arg(Arg::new("contact").long("contact"))
                        .arg(
                            Arg::new("role")
                                .long("role")
                                .required(true)
                                .help("lent|borrowed"),
                        )
                        .arg(Arg::new("principal").long("principal").required(true))
                        .arg(
                            Arg::new("rate")
                                .long("rate")
                                .default_value("0")
                                .help("Annual interest rate in percent"),
                        )
                        .arg(
                            Arg::new("interest-type")
                                .long("interest-type")
                                .default_value("simple")
                                .help("simple|monthly"),
                        )
                        .arg(
                            Arg::new("start")
                                .long("start")
                                .help("YYYY-MM-DD, defaults to today"),
                        )
                        .arg(Arg::new("due").long("due").required(true)),
                )
                .subcommand(json_flags(Command::new("list").about("List loans")))
                .subcommand(
                    Command::new("settle")
                        .about("Settle a loan in full; writes the settlement entries")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("paid")
                                .long("paid")
                                .required(true)
                                .help("Total amount paid; must cover the principal"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("YYYY-MM-DD, defaults to today"),
                        ),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Edit loan details")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("person").long("person"))
                        .arg(Arg::new("contact").long("contact"))
                        .arg(Arg::new("due").long("due").help("YYYY-MM-DD")),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete a loan and its ledger entries")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("due").about("Loans due within a week; advances reminder stages"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Aggregated views of the ledger")
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Monthly P&L, method balances, and loan exposure")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("YYYY-MM, defaults to the current month"),
                        )
                        .arg(
                            Arg::new("currency")
                                .long("currency")
                                .help("Display currency (rate set via 'report set-rate')"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("cashflow")
                        .about("Per-month income/expense/investment")
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("methods").about("Running balance per payment method"),
                ))
                .subcommand(
                    Command::new("set-rate")
                        .about("Store a display conversion rate")
                        .arg(Arg::new("currency").required(true))
                        .arg(Arg::new("rate").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export decoded data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export the transaction history")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .required(true)
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Scan the ledger for integrity issues"))
}
