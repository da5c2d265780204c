// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxnKind {
    Income,
    Expense,
    Investment,
}

impl TxnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxnKind::Income => "income",
            TxnKind::Expense => "expense",
            TxnKind::Investment => "investment",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TxnKind::Income),
            "expense" => Ok(TxnKind::Expense),
            "investment" => Ok(TxnKind::Investment),
            other => Err(LedgerError::Validation(format!(
                "unknown kind '{}', expected income|expense|investment",
                other
            ))),
        }
    }

    /// Sign this kind carries when it contributes to a running balance.
    pub fn sign(&self) -> Decimal {
        match self {
            TxnKind::Income => Decimal::ONE,
            TxnKind::Expense | TxnKind::Investment => Decimal::NEGATIVE_ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanRole {
    Lent,
    Borrowed,
}

impl LoanRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanRole::Lent => "lent",
            LoanRole::Borrowed => "borrowed",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "lent" => Ok(LoanRole::Lent),
            "borrowed" => Ok(LoanRole::Borrowed),
            other => Err(LedgerError::Validation(format!(
                "unknown role '{}', expected lent|borrowed",
                other
            ))),
        }
    }
}

/// Informational only; settlement math operates on the paid amount alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    Simple,
    Monthly,
}

impl InterestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterestType::Simple => "simple",
            InterestType::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Ok(InterestType::Simple),
            "monthly" => Ok(InterestType::Monthly),
            other => Err(LedgerError::Validation(format!(
                "unknown interest type '{}', expected simple|monthly",
                other
            ))),
        }
    }
}

/// Due-date notification ladder. Declaration order is the advancement order;
/// stages never move backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReminderStage {
    #[serde(rename = "none")]
    None,
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "3days")]
    ThreeDays,
    #[serde(rename = "duedate")]
    DueDate,
}

impl ReminderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReminderStage::None => "none",
            ReminderStage::SevenDays => "7days",
            ReminderStage::ThreeDays => "3days",
            ReminderStage::DueDate => "duedate",
        }
    }

    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(ReminderStage::None),
            "7days" => Ok(ReminderStage::SevenDays),
            "3days" => Ok(ReminderStage::ThreeDays),
            "duedate" => Ok(ReminderStage::DueDate),
            other => Err(LedgerError::Validation(format!(
                "unknown reminder stage '{}'",
                other
            ))),
        }
    }
}

/// Typed classification of a ledger entry, derived from its loan link. The
/// stored `method`/`note` strings stay the observable format; this is what
/// code branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrigin {
    Manual,
    LoanPrincipal(i64),
    LoanInterest(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner_id: i64,
    /// The date the financial event happened; distinct from row creation time.
    pub date: NaiveDate,
    pub kind: TxnKind,
    /// Non-negative magnitude; sign is implied by `kind`.
    pub amount: Decimal,
    pub category: String,
    pub method: String,
    pub is_principal: bool,
    pub loan_id: Option<i64>,
    pub note: Option<String>,
}

impl Transaction {
    pub fn origin(&self) -> EntryOrigin {
        match (self.loan_id, self.is_principal) {
            (Some(id), true) => EntryOrigin::LoanPrincipal(id),
            (Some(id), false) => EntryOrigin::LoanInterest(id),
            (None, _) => EntryOrigin::Manual,
        }
    }
}

/// Entry template produced by the ledger engine or a `tx add`, before it has
/// an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub kind: TxnKind,
    pub amount: Decimal,
    pub category: String,
    pub method: String,
    pub is_principal: bool,
    pub loan_id: Option<i64>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: i64,
    pub owner_id: i64,
    pub person: String,
    pub contact: Option<String>,
    pub role: LoanRole,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub interest_amount: Decimal,
    pub total_amount: Decimal,
    pub interest_type: InterestType,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub settled: bool,
    pub reminder_stage: ReminderStage,
}

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub person: String,
    pub contact: Option<String>,
    pub role: LoanRole,
    pub principal: Decimal,
    pub interest_rate: Decimal,
    pub interest_amount: Decimal,
    pub total_amount: Decimal,
    pub interest_type: InterestType,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}
