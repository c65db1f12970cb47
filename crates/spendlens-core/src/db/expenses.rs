//! Expense operations

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::expense_filter::ExpenseFilter;
use super::{parse_datetime, parse_expense_date, Database, DATETIME_FORMAT};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense};

const EXPENSE_COLUMNS: &str =
    "e.id, e.owner_id, e.amount, e.category, e.payment_mode, e.date, e.notes, e.envelope_id, e.created_at";

/// Fail with NotFound unless `envelope_id` belongs to `owner_id`
pub(crate) fn ensure_envelope(conn: &Connection, owner_id: &str, envelope_id: i64) -> Result<()> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM envelopes WHERE id = ? AND owner_id = ?",
            params![envelope_id, owner_id],
            |row| row.get(0),
        )
        .optional()?;

    match exists {
        Some(_) => Ok(()),
        None => Err(Error::NotFound(format!("Envelope {} not found", envelope_id))),
    }
}

impl Database {
    /// Insert an expense for `owner_id`, returning its id
    pub fn insert_expense(&self, owner_id: &str, expense: &NewExpense) -> Result<i64> {
        expense.validate()?;
        let conn = self.conn()?;

        if let Some(envelope_id) = expense.envelope_id {
            ensure_envelope(&conn, owner_id, envelope_id)?;
        }

        conn.execute(
            r#"
            INSERT INTO expenses (owner_id, amount, category, payment_mode, date, notes, envelope_id)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner_id,
                expense.amount,
                expense.category.trim(),
                expense.payment_mode.map(|p| p.as_str()),
                expense.date.format(DATETIME_FORMAT).to_string(),
                expense.notes,
                expense.envelope_id,
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(owner = owner_id, expense = id, "Expense recorded");
        Ok(id)
    }

    /// Get a single expense; another owner's expense is reported as absent
    pub fn get_expense(&self, owner_id: &str, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM expenses e WHERE e.id = ? AND e.owner_id = ?",
            EXPENSE_COLUMNS
        );
        let expense = conn
            .query_row(&sql, params![id, owner_id], |row| Self::row_to_expense(row))
            .optional()?;
        Ok(expense)
    }

    /// List expenses matching `filter`, newest first
    pub fn list_expenses(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let filter = filter.build(owner_id);

        let sql = format!(
            r#"
            SELECT {}
            FROM expenses e
            {}
            ORDER BY e.date DESC, e.id DESC
            "#,
            EXPENSE_COLUMNS, filter.where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let expenses = stmt
            .query_map(filter.params_refs().as_slice(), |row| {
                Self::row_to_expense(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(expenses)
    }

    /// Count all expenses for `owner_id`
    pub fn count_expenses(&self, owner_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE owner_id = ?",
            params![owner_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Replace every field of an existing expense
    pub fn update_expense(&self, owner_id: &str, id: i64, expense: &NewExpense) -> Result<()> {
        expense.validate()?;
        let conn = self.conn()?;

        if let Some(envelope_id) = expense.envelope_id {
            ensure_envelope(&conn, owner_id, envelope_id)?;
        }

        let updated = conn.execute(
            r#"
            UPDATE expenses
            SET amount = ?, category = ?, payment_mode = ?, date = ?, notes = ?, envelope_id = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                expense.amount,
                expense.category.trim(),
                expense.payment_mode.map(|p| p.as_str()),
                expense.date.format(DATETIME_FORMAT).to_string(),
                expense.notes,
                expense.envelope_id,
                id,
                owner_id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        Ok(())
    }

    pub fn delete_expense(&self, owner_id: &str, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM expenses WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;

        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", id)));
        }
        debug!(owner = owner_id, expense = id, "Expense deleted");
        Ok(())
    }

    /// Link an expense to an envelope, or unlink it with `None`
    pub fn assign_expense_envelope(
        &self,
        owner_id: &str,
        expense_id: i64,
        envelope_id: Option<i64>,
    ) -> Result<()> {
        let conn = self.conn()?;

        if let Some(eid) = envelope_id {
            ensure_envelope(&conn, owner_id, eid)?;
        }

        let updated = conn.execute(
            "UPDATE expenses SET envelope_id = ? WHERE id = ? AND owner_id = ?",
            params![envelope_id, expense_id, owner_id],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Expense {} not found", expense_id)));
        }
        Ok(())
    }

    /// Helper to convert a row to Expense
    /// Column order: id, owner_id, amount, category, payment_mode, date, notes, envelope_id, created_at
    pub(crate) fn row_to_expense(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        let payment_mode_str: Option<String> = row.get(4)?;
        let date_str: String = row.get(5)?;
        let created_at_str: String = row.get(8)?;
        Ok(Expense {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            amount: row.get(2)?,
            category: row.get(3)?,
            payment_mode: payment_mode_str.and_then(|s| s.parse().ok()),
            date: parse_expense_date(&date_str)?,
            notes: row.get(6)?,
            envelope_id: row.get(7)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
