//! Spendlens Core Library
//!
//! Shared functionality for the Spendlens expense tracker:
//! - Database access and migrations (expenses, envelopes, insight preferences)
//! - Spending analytics: aggregation, statistics, trends and budget progress
//! - Rule-based insight generation with persisted save/dismiss state
//! - Report builders for display (the only place amounts are rounded)
//! - Analytics configuration with a TOML override

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod models;
pub mod reports;

pub use analytics::{
    Aggregates, BudgetProgress, Direction, DistributionBucket, SeriesStatistics, TrendReport,
    WindowComparison,
};
pub use config::AnalyticsConfig;
pub use db::{Database, ExpenseFilter};
pub use error::{Error, Result};
pub use insights::{
    Insight, InsightContext, InsightGenerator, InsightId, InsightPreference, InsightRule,
    InsightType, Severity,
};
