// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::{Connection, Row, params};
use rust_decimal::Decimal;

use crate::errors::{LedgerError, Result};
use crate::ledger;
use crate::models::{
    InterestType, Loan, LoanRole, NewLoan, NewTransaction, ReminderStage, Transaction, TxnKind,
};
use crate::vault::FieldVault;

/// Owner-scoped persistence adapter. Confidential columns pass through the
/// vault here; every layer above sees plaintext. All lookups filter by
/// profile, so a wrong-owner id reads the same as a missing one.
pub struct Store<'a> {
    conn: &'a Connection,
    vault: &'a FieldVault,
}

#[derive(Debug)]
pub enum SettleOutcome {
    Settled { loan: Loan, entries: Vec<Transaction> },
    /// Settling twice is a benign no-op: current state, zero new entries.
    AlreadySettled(Loan),
}

pub enum DeleteOutcome {
    Transaction,
    TransactionAndLoan,
}

impl<'a> Store<'a> {
    pub fn new(conn: &'a Connection, vault: &'a FieldVault) -> Self {
        Self { conn, vault }
    }

    pub fn insert_transaction(&self, owner: i64, t: &NewTransaction) -> Result<i64> {
        if t.amount < Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "amount must not be negative, got {}",
                t.amount
            )));
        }
        let amount = self.vault.encrypt(&t.amount.to_string())?;
        let category = self.vault.encrypt(&t.category)?;
        let note = match &t.note {
            Some(n) => Some(self.vault.encrypt(n)?),
            None => None,
        };
        self.conn.execute(
            "INSERT INTO transactions(profile_id, date, kind, amount, category, method, is_principal, loan_id, note)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9)",
            params![
                owner,
                t.date.to_string(),
                t.kind.as_str(),
                amount,
                category,
                t.method,
                t.is_principal as i64,
                t.loan_id,
                note
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Full decoded history, newest first.
    pub fn transactions(&self, owner: i64) -> Result<Vec<Transaction>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, date, kind, amount, category, method, is_principal, loan_id, note
             FROM transactions WHERE profile_id=?1 ORDER BY date DESC, id DESC",
        )?;
        let mut rows = stmt.query(params![owner])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(self.txn_from_row(r)?);
        }
        Ok(out)
    }

    pub fn find_transaction(&self, owner: i64, id: i64) -> Result<Transaction> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, date, kind, amount, category, method, is_principal, loan_id, note
             FROM transactions WHERE id=?1 AND profile_id=?2",
        )?;
        let mut rows = stmt.query(params![id, owner])?;
        match rows.next()? {
            Some(r) => self.txn_from_row(r),
            None => Err(LedgerError::NotFound),
        }
    }

    /// Removing a loan-linked entry removes the loan itself; the FK cascade
    /// then clears any sibling entries. No orphan loan-linked record persists.
    pub fn delete_transaction(&self, owner: i64, id: i64) -> Result<DeleteOutcome> {
        let txn = self.find_transaction(owner, id)?;
        match txn.loan_id {
            Some(loan_id) => {
                let tx = self.conn.unchecked_transaction()?;
                let removed = tx.execute(
                    "DELETE FROM loans WHERE id=?1 AND profile_id=?2",
                    params![loan_id, owner],
                )?;
                if removed == 0 {
                    tx.execute(
                        "DELETE FROM transactions WHERE id=?1 AND profile_id=?2",
                        params![id, owner],
                    )?;
                    tx.commit()?;
                    return Ok(DeleteOutcome::Transaction);
                }
                tx.commit()?;
                Ok(DeleteOutcome::TransactionAndLoan)
            }
            None => {
                self.conn.execute(
                    "DELETE FROM transactions WHERE id=?1 AND profile_id=?2",
                    params![id, owner],
                )?;
                Ok(DeleteOutcome::Transaction)
            }
        }
    }

    /// Inserts the loan and its principal-movement entry as one unit. If the
    /// entry cannot be written the loan row does not survive.
    pub fn create_loan(&self, owner: i64, l: &NewLoan) -> Result<(Loan, Transaction)> {
        if l.person.trim().is_empty() {
            return Err(LedgerError::Validation(
                "counterparty name is required".to_string(),
            ));
        }
        if l.principal <= Decimal::ZERO {
            return Err(LedgerError::Validation(format!(
                "principal must be positive, got {}",
                l.principal
            )));
        }
        if l.due_date < l.start_date {
            return Err(LedgerError::Validation(format!(
                "due date {} is before start date {}",
                l.due_date, l.start_date
            )));
        }

        let person = self.vault.encrypt(&l.person)?;
        let contact = match &l.contact {
            Some(c) => Some(self.vault.encrypt(c)?),
            None => None,
        };
        let principal = self.vault.encrypt(&l.principal.to_string())?;
        let interest_rate = self.vault.encrypt(&l.interest_rate.to_string())?;
        let interest_amount = self.vault.encrypt(&l.interest_amount.to_string())?;
        let total_amount = self.vault.encrypt(&l.total_amount.to_string())?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO loans(profile_id, person, contact, role, principal, interest_rate,
                               interest_amount, total_amount, interest_type, start_date, due_date)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
            params![
                owner,
                person,
                contact,
                l.role.as_str(),
                principal,
                interest_rate,
                interest_amount,
                total_amount,
                l.interest_type.as_str(),
                l.start_date.to_string(),
                l.due_date.to_string()
            ],
        )?;
        let loan_id = self.conn.last_insert_rowid();
        let mut entry = ledger::principal_entry(l.role, l.principal, &l.person, l.start_date);
        entry.loan_id = Some(loan_id);
        let entry_id = self.insert_transaction(owner, &entry)?;
        tx.commit()?;

        Ok((
            self.find_loan(owner, loan_id)?,
            self.find_transaction(owner, entry_id)?,
        ))
    }

    pub fn loans(&self, owner: i64) -> Result<Vec<Loan>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, person, contact, role, principal, interest_rate,
                    interest_amount, total_amount, interest_type, start_date, due_date,
                    settled, reminder_stage
             FROM loans WHERE profile_id=?1 ORDER BY due_date, id",
        )?;
        let mut rows = stmt.query(params![owner])?;
        let mut out = Vec::new();
        while let Some(r) = rows.next()? {
            out.push(self.loan_from_row(r)?);
        }
        Ok(out)
    }

    pub fn find_loan(&self, owner: i64, id: i64) -> Result<Loan> {
        let mut stmt = self.conn.prepare(
            "SELECT id, profile_id, person, contact, role, principal, interest_rate,
                    interest_amount, total_amount, interest_type, start_date, due_date,
                    settled, reminder_stage
             FROM loans WHERE id=?1 AND profile_id=?2",
        )?;
        let mut rows = stmt.query(params![id, owner])?;
        match rows.next()? {
            Some(r) => self.loan_from_row(r),
            None => Err(LedgerError::NotFound),
        }
    }

    /// Settles a loan at most once. The settled-flag flip and the entry
    /// inserts commit as one unit; the conditional update is the guard, so a
    /// racing second caller finds zero rows to flip and emits nothing.
    pub fn settle_loan(
        &self,
        owner: i64,
        id: i64,
        paid: Decimal,
        date: NaiveDate,
    ) -> Result<SettleOutcome> {
        let tx = self.conn.unchecked_transaction()?;
        let loan = self.find_loan(owner, id)?;
        if loan.settled {
            return Ok(SettleOutcome::AlreadySettled(loan));
        }
        let templates = ledger::settlement_entries(&loan, paid, date)?;
        let flipped = tx.execute(
            "UPDATE loans SET settled=1 WHERE id=?1 AND profile_id=?2 AND settled=0",
            params![id, owner],
        )?;
        if flipped == 0 {
            return Ok(SettleOutcome::AlreadySettled(loan));
        }
        let mut entries = Vec::with_capacity(templates.len());
        for template in &templates {
            let entry_id = self.insert_transaction(owner, template)?;
            entries.push(self.find_transaction(owner, entry_id)?);
        }
        tx.commit()?;
        tracing::info!(loan = id, entries = entries.len(), "loan settled");

        let loan = self.find_loan(owner, id)?;
        Ok(SettleOutcome::Settled { loan, entries })
    }

    /// FK cascade removes the linked entries with the loan row.
    pub fn delete_loan(&self, owner: i64, id: i64) -> Result<()> {
        let removed = self.conn.execute(
            "DELETE FROM loans WHERE id=?1 AND profile_id=?2",
            params![id, owner],
        )?;
        if removed == 0 {
            return Err(LedgerError::NotFound);
        }
        Ok(())
    }

    /// Counterparty details may change at any time; terms only while the
    /// loan is open. Nothing here can reopen settlement.
    pub fn update_loan_meta(
        &self,
        owner: i64,
        id: i64,
        person: Option<&str>,
        contact: Option<&str>,
        due_date: Option<NaiveDate>,
    ) -> Result<Loan> {
        let loan = self.find_loan(owner, id)?;
        if let Some(due) = due_date {
            if loan.settled {
                return Err(LedgerError::Validation(
                    "terms of a settled loan cannot change".to_string(),
                ));
            }
            if due < loan.start_date {
                return Err(LedgerError::Validation(format!(
                    "due date {} is before start date {}",
                    due, loan.start_date
                )));
            }
            self.conn.execute(
                "UPDATE loans SET due_date=?1 WHERE id=?2 AND profile_id=?3",
                params![due.to_string(), id, owner],
            )?;
        }
        if let Some(p) = person {
            if p.trim().is_empty() {
                return Err(LedgerError::Validation(
                    "counterparty name is required".to_string(),
                ));
            }
            let enc = self.vault.encrypt(p)?;
            self.conn.execute(
                "UPDATE loans SET person=?1 WHERE id=?2 AND profile_id=?3",
                params![enc, id, owner],
            )?;
        }
        if let Some(c) = contact {
            let enc = self.vault.encrypt(c)?;
            self.conn.execute(
                "UPDATE loans SET contact=?1 WHERE id=?2 AND profile_id=?3",
                params![enc, id, owner],
            )?;
        }
        self.find_loan(owner, id)
    }

    /// The reminder ladder only moves forward, and never for settled loans.
    pub fn advance_reminder(&self, owner: i64, id: i64, stage: ReminderStage) -> Result<Loan> {
        let loan = self.find_loan(owner, id)?;
        if !loan.settled && stage > loan.reminder_stage {
            self.conn.execute(
                "UPDATE loans SET reminder_stage=?1 WHERE id=?2 AND profile_id=?3",
                params![stage.as_str(), id, owner],
            )?;
        }
        self.find_loan(owner, id)
    }

    fn txn_from_row(&self, r: &Row<'_>) -> Result<Transaction> {
        let date: String = r.get(2)?;
        let kind: String = r.get(3)?;
        let amount: String = r.get(4)?;
        let category: String = r.get(5)?;
        let note: Option<String> = r.get(9)?;
        Ok(Transaction {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            date: parse_stored_date(&date)?,
            kind: TxnKind::parse(&kind)?,
            amount: parse_stored_decimal(&self.vault.decrypt(&amount))?,
            category: self.vault.decrypt(&category),
            method: r.get(6)?,
            is_principal: r.get::<_, i64>(7)? != 0,
            loan_id: r.get(8)?,
            note: note.map(|n| self.vault.decrypt(&n)),
        })
    }

    fn loan_from_row(&self, r: &Row<'_>) -> Result<Loan> {
        let person: String = r.get(2)?;
        let contact: Option<String> = r.get(3)?;
        let role: String = r.get(4)?;
        let principal: String = r.get(5)?;
        let interest_rate: String = r.get(6)?;
        let interest_amount: String = r.get(7)?;
        let total_amount: String = r.get(8)?;
        let interest_type: String = r.get(9)?;
        let start_date: String = r.get(10)?;
        let due_date: String = r.get(11)?;
        let reminder_stage: String = r.get(13)?;
        Ok(Loan {
            id: r.get(0)?,
            owner_id: r.get(1)?,
            person: self.vault.decrypt(&person),
            contact: contact.map(|c| self.vault.decrypt(&c)),
            role: LoanRole::parse(&role)?,
            principal: parse_stored_decimal(&self.vault.decrypt(&principal))?,
            interest_rate: parse_stored_decimal(&self.vault.decrypt(&interest_rate))?,
            interest_amount: parse_stored_decimal(&self.vault.decrypt(&interest_amount))?,
            total_amount: parse_stored_decimal(&self.vault.decrypt(&total_amount))?,
            interest_type: InterestType::parse(&interest_type)?,
            start_date: parse_stored_date(&start_date)?,
            due_date: parse_stored_date(&due_date)?,
            settled: r.get::<_, i64>(12)? != 0,
            reminder_stage: ReminderStage::parse(&reminder_stage)?,
        })
    }
}

fn parse_stored_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("invalid stored date '{}'", s)))
}

fn parse_stored_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .map_err(|_| LedgerError::Validation(format!("invalid stored amount '{}'", s)))
}
