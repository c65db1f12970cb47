//! Budget envelope operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, parse_stored_date, Database, DATE_FORMAT};
use crate::error::{Error, Result};
use crate::models::{Envelope, NewEnvelope};

const ENVELOPE_COLUMNS: &str =
    "id, owner_id, name, budget, start_date, end_date, description, created_at";

impl Database {
    /// Create an envelope, returning its id
    pub fn insert_envelope(&self, owner_id: &str, envelope: &NewEnvelope) -> Result<i64> {
        envelope.validate()?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO envelopes (owner_id, name, budget, start_date, end_date, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                owner_id,
                envelope.name.trim(),
                envelope.budget,
                envelope.start_date.format(DATE_FORMAT).to_string(),
                envelope.end_date.format(DATE_FORMAT).to_string(),
                envelope.description,
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get an envelope; another owner's envelope is reported as absent
    pub fn get_envelope(&self, owner_id: &str, id: i64) -> Result<Option<Envelope>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM envelopes WHERE id = ? AND owner_id = ?",
            ENVELOPE_COLUMNS
        );
        let envelope = conn
            .query_row(&sql, params![id, owner_id], |row| Self::row_to_envelope(row))
            .optional()?;
        Ok(envelope)
    }

    /// List envelopes, latest start date first
    pub fn list_envelopes(&self, owner_id: &str) -> Result<Vec<Envelope>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM envelopes WHERE owner_id = ? ORDER BY start_date DESC, id DESC",
            ENVELOPE_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let envelopes = stmt
            .query_map(params![owner_id], |row| Self::row_to_envelope(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(envelopes)
    }

    pub fn update_envelope(&self, owner_id: &str, id: i64, envelope: &NewEnvelope) -> Result<()> {
        envelope.validate()?;
        let conn = self.conn()?;

        let updated = conn.execute(
            r#"
            UPDATE envelopes
            SET name = ?, budget = ?, start_date = ?, end_date = ?, description = ?
            WHERE id = ? AND owner_id = ?
            "#,
            params![
                envelope.name.trim(),
                envelope.budget,
                envelope.start_date.format(DATE_FORMAT).to_string(),
                envelope.end_date.format(DATE_FORMAT).to_string(),
                envelope.description,
                id,
                owner_id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("Envelope {} not found", id)));
        }
        Ok(())
    }

    /// Delete an envelope. Expenses that referenced it are kept and unlinked;
    /// returns how many were unlinked.
    pub fn delete_envelope(&self, owner_id: &str, id: i64) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let unlinked = tx.execute(
            "UPDATE expenses SET envelope_id = NULL WHERE envelope_id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;

        let deleted = tx.execute(
            "DELETE FROM envelopes WHERE id = ? AND owner_id = ?",
            params![id, owner_id],
        )?;

        if deleted == 0 {
            // Dropping the transaction rolls back the unlink
            return Err(Error::NotFound(format!("Envelope {} not found", id)));
        }

        tx.commit()?;
        info!(owner = owner_id, envelope = id, unlinked, "Envelope deleted");
        Ok(unlinked)
    }

    /// Helper to convert a row to Envelope
    /// Column order: id, owner_id, name, budget, start_date, end_date, description, created_at
    fn row_to_envelope(row: &rusqlite::Row) -> rusqlite::Result<Envelope> {
        let start_str: String = row.get(4)?;
        let end_str: String = row.get(5)?;
        let created_at_str: String = row.get(7)?;
        Ok(Envelope {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            budget: row.get(3)?,
            start_date: parse_stored_date(&start_str)?,
            end_date: parse_stored_date(&end_str)?,
            description: row.get(6)?,
            created_at: parse_datetime(&created_at_str),
        })
    }
}
