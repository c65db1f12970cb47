//! Per-owner saved and dismissed insight state
//!
//! The record is a plain value: the database layer loads it, applies one of
//! the mutations below inside a transaction, and writes it back. Saved and
//! dismissed sets are kept disjoint by every mutation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A non-blank insight id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InsightId(String);

impl InsightId {
    /// Validate an id supplied by a caller
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::Validation("insightId is required".to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Validate an optional id, treating `None` as missing
    pub fn require(raw: Option<&str>) -> Result<Self> {
        match raw {
            Some(id) => Self::parse(id),
            None => Err(Error::Validation("insightId is required".to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for InsightId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<InsightId> for String {
    fn from(id: InsightId) -> Self {
        id.0
    }
}

impl fmt::Display for InsightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion-ordered set of insight ids.
///
/// Stored as a JSON array; duplicates in stored data collapse on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct InsightIdSet(Vec<String>);

impl InsightIdSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|existing| existing == id)
    }

    /// Add `id`; returns false if it was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    /// Remove `id`; returns false if it was absent
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| existing != id);
        self.0.len() != before
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for InsightIdSet {
    fn from(ids: Vec<String>) -> Self {
        let mut set = Self::new();
        for id in &ids {
            set.insert(id);
        }
        set
    }
}

impl From<InsightIdSet> for Vec<String> {
    fn from(set: InsightIdSet) -> Self {
        set.0
    }
}

/// Saved/dismissed insight state for one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPreference {
    pub owner_id: String,
    pub saved_insight_ids: InsightIdSet,
    pub dismissed_insight_ids: InsightIdSet,
    pub last_generated_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InsightPreference {
    /// Empty record for a new owner
    pub fn new(owner_id: &str, now: DateTime<Utc>) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            saved_insight_ids: InsightIdSet::new(),
            dismissed_insight_ids: InsightIdSet::new(),
            last_generated_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved_insight_ids.contains(id)
    }

    pub fn is_dismissed(&self, id: &str) -> bool {
        self.dismissed_insight_ids.contains(id)
    }

    /// Save `id`, taking it out of the dismissed set
    pub fn save(&mut self, id: &InsightId) {
        self.saved_insight_ids.insert(id.as_str());
        self.dismissed_insight_ids.remove(id.as_str());
    }

    pub fn unsave(&mut self, id: &InsightId) {
        self.saved_insight_ids.remove(id.as_str());
    }

    /// Dismiss `id`, taking it out of the saved set
    pub fn dismiss(&mut self, id: &InsightId) {
        self.dismissed_insight_ids.insert(id.as_str());
        self.saved_insight_ids.remove(id.as_str());
    }

    /// Clear every dismissal; saved ids stay
    pub fn restore_dismissed(&mut self) {
        self.dismissed_insight_ids.clear();
    }
}
