//! Insight preference persistence
//!
//! Every mutation is a read-modify-write of the owner's row inside a single
//! `BEGIN IMMEDIATE` transaction. The immediate lock is taken before the read,
//! so two concurrent mutations for the same owner cannot interleave and the
//! saved/dismissed sets stay disjoint.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{params, OptionalExtension, Transaction, TransactionBehavior};
use tracing::{info, warn};

use super::{parse_datetime, Database, DATETIME_FORMAT};
use crate::error::{Error, Result};
use crate::insights::{InsightId, InsightIdSet, InsightPreference};

/// What to do when the owner has no preference row yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Missing {
    Create,
    Fail,
}

/// Current time at the precision the table stores
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(DATETIME_FORMAT).to_string()
}

fn load_preference(tx: &Transaction<'_>, owner_id: &str) -> Result<Option<InsightPreference>> {
    let row = tx
        .query_row(
            r#"
            SELECT saved_insight_ids, dismissed_insight_ids, last_generated_at, created_at, updated_at
            FROM insight_preferences WHERE owner_id = ?
            "#,
            params![owner_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()?;

    let Some((saved, dismissed, last_generated, created, updated)) = row else {
        return Ok(None);
    };

    let mut saved: InsightIdSet = serde_json::from_str(&saved).map_err(|e| {
        Error::InvalidData(format!("saved insight ids for {}: {}", owner_id, e))
    })?;
    let dismissed: InsightIdSet = serde_json::from_str(&dismissed).map_err(|e| {
        Error::InvalidData(format!("dismissed insight ids for {}: {}", owner_id, e))
    })?;

    // Saved and dismissed must stay disjoint; a dismissal wins over stale saved state
    let mut overlapping = 0;
    for id in dismissed.iter() {
        if saved.remove(id) {
            overlapping += 1;
        }
    }
    if overlapping > 0 {
        warn!(
            owner = owner_id,
            count = overlapping,
            "Dropped saved insight ids that are also dismissed"
        );
    }

    Ok(Some(InsightPreference {
        owner_id: owner_id.to_string(),
        saved_insight_ids: saved,
        dismissed_insight_ids: dismissed,
        last_generated_at: last_generated.as_deref().map(parse_datetime),
        created_at: parse_datetime(&created),
        updated_at: parse_datetime(&updated),
    }))
}

fn store_preference(tx: &Transaction<'_>, pref: &InsightPreference) -> Result<()> {
    tx.execute(
        r#"
        INSERT INTO insight_preferences
            (owner_id, saved_insight_ids, dismissed_insight_ids, last_generated_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(owner_id) DO UPDATE SET
            saved_insight_ids = excluded.saved_insight_ids,
            dismissed_insight_ids = excluded.dismissed_insight_ids,
            last_generated_at = excluded.last_generated_at,
            updated_at = excluded.updated_at
        "#,
        params![
            pref.owner_id,
            serde_json::to_string(&pref.saved_insight_ids)?,
            serde_json::to_string(&pref.dismissed_insight_ids)?,
            pref.last_generated_at.as_ref().map(format_timestamp),
            format_timestamp(&pref.created_at),
            format_timestamp(&pref.updated_at),
        ],
    )?;
    Ok(())
}

impl Database {
    /// Apply `change` to the owner's record atomically and return the result
    fn mutate_insight_preference<F>(
        &self,
        owner_id: &str,
        missing: Missing,
        change: F,
    ) -> Result<InsightPreference>
    where
        F: FnOnce(&mut InsightPreference),
    {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let now = now();
        let mut pref = match (load_preference(&tx, owner_id)?, missing) {
            (Some(pref), _) => pref,
            (None, Missing::Create) => InsightPreference::new(owner_id, now),
            (None, Missing::Fail) => {
                return Err(Error::NotFound(format!(
                    "Insight preferences for {} not found",
                    owner_id
                )))
            }
        };

        change(&mut pref);
        pref.updated_at = now;

        store_preference(&tx, &pref)?;
        tx.commit()?;
        Ok(pref)
    }

    /// Read the owner's preferences without creating them
    pub fn get_insight_preference(&self, owner_id: &str) -> Result<Option<InsightPreference>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let pref = load_preference(&tx, owner_id)?;
        tx.commit()?;
        Ok(pref)
    }

    /// Return the owner's preferences, creating an empty record if needed
    pub fn get_or_create_insight_preference(&self, owner_id: &str) -> Result<InsightPreference> {
        let mut conn = self.conn()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let pref = match load_preference(&tx, owner_id)? {
            Some(pref) => pref,
            None => {
                let pref = InsightPreference::new(owner_id, now());
                store_preference(&tx, &pref)?;
                info!(owner = owner_id, "Insight preferences created");
                pref
            }
        };

        tx.commit()?;
        Ok(pref)
    }

    /// Save an insight (and undismiss it)
    pub fn save_insight(&self, owner_id: &str, insight_id: &InsightId) -> Result<InsightPreference> {
        let pref =
            self.mutate_insight_preference(owner_id, Missing::Create, |p| p.save(insight_id))?;
        info!(owner = owner_id, insight = %insight_id, "Insight saved");
        Ok(pref)
    }

    /// Remove an insight from the saved set. The record must already exist.
    pub fn unsave_insight(&self, owner_id: &str, insight_id: &InsightId) -> Result<InsightPreference> {
        let pref = self.mutate_insight_preference(owner_id, Missing::Fail, |p| p.unsave(insight_id))?;
        info!(owner = owner_id, insight = %insight_id, "Insight unsaved");
        Ok(pref)
    }

    /// Dismiss an insight (and unsave it). The record must already exist.
    pub fn dismiss_insight(&self, owner_id: &str, insight_id: &InsightId) -> Result<InsightPreference> {
        let pref =
            self.mutate_insight_preference(owner_id, Missing::Fail, |p| p.dismiss(insight_id))?;
        info!(owner = owner_id, insight = %insight_id, "Insight dismissed");
        Ok(pref)
    }

    /// Clear every dismissal for the owner
    pub fn restore_dismissed_insights(&self, owner_id: &str) -> Result<InsightPreference> {
        let pref =
            self.mutate_insight_preference(owner_id, Missing::Create, |p| p.restore_dismissed())?;
        info!(owner = owner_id, "Dismissed insights restored");
        Ok(pref)
    }

    /// Record that insights were generated for the owner at `at`
    pub fn touch_insights_generated(
        &self,
        owner_id: &str,
        at: DateTime<Utc>,
    ) -> Result<InsightPreference> {
        self.mutate_insight_preference(owner_id, Missing::Create, |p| {
            p.last_generated_at = Some(at)
        })
    }
}
