// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::errors::{LedgerError, Result};
use crate::models::{Loan, LoanRole, NewTransaction, Transaction, TxnKind};

/// Entry emitted when a loan is created: the principal leaving (lent) or
/// entering (borrowed) the owner's cash position. The caller links it to the
/// loan row once that row has an id.
pub fn principal_entry(
    role: LoanRole,
    principal: Decimal,
    person: &str,
    date: NaiveDate,
) -> NewTransaction {
    match role {
        LoanRole::Lent => NewTransaction {
            date,
            kind: TxnKind::Expense,
            amount: principal,
            category: "loan principal".to_string(),
            method: "loan".to_string(),
            is_principal: true,
            loan_id: None,
            note: Some(format!("Loan given to {}", person)),
        },
        LoanRole::Borrowed => NewTransaction {
            date,
            kind: TxnKind::Income,
            amount: principal,
            category: "Borrowed principal".to_string(),
            method: "Borrow".to_string(),
            is_principal: true,
            loan_id: None,
            note: Some(format!("Loan borrowed from {}", person)),
        },
    }
}

/// Splits a settlement payment into principal and interest entries.
///
/// The paid amount must cover the full principal; whatever exceeds it is the
/// interest portion and yields a second entry. Both are signed opposite to
/// the creation-time entry: settling a lent loan brings money back in,
/// settling a borrowed one pays it out.
pub fn settlement_entries(loan: &Loan, paid: Decimal, date: NaiveDate) -> Result<Vec<NewTransaction>> {
    if loan.settled {
        return Err(LedgerError::AlreadySettled);
    }
    if paid < loan.principal {
        return Err(LedgerError::Validation(format!(
            "paid amount {} does not cover principal {}",
            paid, loan.principal
        )));
    }
    let interest = paid - loan.principal;

    let mut entries = Vec::with_capacity(2);
    match loan.role {
        LoanRole::Borrowed => {
            entries.push(NewTransaction {
                date,
                kind: TxnKind::Expense,
                amount: loan.principal,
                category: "Borrowed principal".to_string(),
                method: "loan".to_string(),
                is_principal: true,
                loan_id: Some(loan.id),
                note: Some(format!("Borrowed principal repaid to {}", loan.person)),
            });
            if interest > Decimal::ZERO {
                entries.push(NewTransaction {
                    date,
                    kind: TxnKind::Expense,
                    amount: interest,
                    category: "Borrowed interest".to_string(),
                    method: "loan".to_string(),
                    is_principal: false,
                    loan_id: Some(loan.id),
                    note: Some(format!("Borrowed interest paid to {}", loan.person)),
                });
            }
        }
        LoanRole::Lent => {
            entries.push(NewTransaction {
                date,
                kind: TxnKind::Income,
                amount: loan.principal,
                category: "loan principal".to_string(),
                method: "loan".to_string(),
                is_principal: true,
                loan_id: Some(loan.id),
                note: Some(format!("Loan principal received from {}", loan.person)),
            });
            if interest > Decimal::ZERO {
                entries.push(NewTransaction {
                    date,
                    kind: TxnKind::Income,
                    amount: interest,
                    category: "loan interest".to_string(),
                    method: "loan".to_string(),
                    is_principal: false,
                    loan_id: Some(loan.id),
                    note: Some(format!("Loan interest received from {}", loan.person)),
                });
            }
        }
    }
    Ok(entries)
}

/// Maps a raw payment method onto its balance bucket. `None` means the entry
/// is loan float rather than spendable cash and stays out of balances.
pub fn normalize_method(raw: &str) -> Option<String> {
    let m = raw.trim().to_lowercase();
    match m.as_str() {
        "" | "loan" | "borrow" => None,
        "online" | "upi" => Some("upi".to_string()),
        _ => Some(m),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Anchor month, `YYYY-MM`.
    pub month: String,
    pub monthly_income: Decimal,
    pub monthly_expense: Decimal,
    pub monthly_investment: Decimal,
    pub method_balances: BTreeMap<String, Decimal>,
    pub total_balance: Decimal,
    pub total_lent: Decimal,
    pub total_borrowed: Decimal,
}

/// Pure aggregation over a decoded snapshot. Same inputs, same output.
///
/// Monthly P&L covers the anchor's calendar month and skips principal
/// movements (balance transfers, not income or spend). Method balances run
/// over all time with loan float excluded. Loan exposure comes from the
/// unsettled loan records alone, answering "how much is outstanding" rather
/// than "how has it moved my cash".
pub fn summarize(txns: &[Transaction], loans: &[Loan], anchor: NaiveDate) -> Summary {
    let mut summary = Summary {
        month: format!("{:04}-{:02}", anchor.year(), anchor.month()),
        monthly_income: Decimal::ZERO,
        monthly_expense: Decimal::ZERO,
        monthly_investment: Decimal::ZERO,
        method_balances: BTreeMap::new(),
        total_balance: Decimal::ZERO,
        total_lent: Decimal::ZERO,
        total_borrowed: Decimal::ZERO,
    };

    for t in txns {
        let in_month = t.date.year() == anchor.year() && t.date.month() == anchor.month();
        if in_month && !t.is_principal {
            match t.kind {
                TxnKind::Income => summary.monthly_income += t.amount,
                TxnKind::Expense => summary.monthly_expense += t.amount,
                TxnKind::Investment => summary.monthly_investment += t.amount,
            }
        }
        if let Some(bucket) = normalize_method(&t.method) {
            *summary
                .method_balances
                .entry(bucket)
                .or_insert(Decimal::ZERO) += t.kind.sign() * t.amount;
        }
    }
    summary.total_balance = summary.method_balances.values().copied().sum();

    for loan in loans {
        if loan.settled {
            continue;
        }
        match loan.role {
            LoanRole::Lent => summary.total_lent += loan.principal,
            LoanRole::Borrowed => summary.total_borrowed += loan.principal,
        }
    }
    summary
}
