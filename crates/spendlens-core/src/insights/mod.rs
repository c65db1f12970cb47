//! Spending insights
//!
//! Insights are regenerated from live expense data on every request. Each one
//! carries the fixed id of the rule that produced it, which is what saved and
//! dismissed preferences refer to.
//!
//! - `types` - insight, type and severity
//! - `rules` - the closed set of built-in rules
//! - `engine` - shared context, generation and ordering
//! - `preferences` - per-owner saved/dismissed state

mod engine;
mod preferences;
mod rules;
mod types;

pub use engine::{filter_dismissed, InsightContext, InsightGenerator};
pub use preferences::{InsightId, InsightIdSet, InsightPreference};
pub use rules::InsightRule;
pub use types::{Insight, InsightType, Severity};
