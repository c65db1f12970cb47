//! Core types for the insight generator

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of observation an insight represents (drives presentation only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// Where the money goes
    Spending,
    /// How spending moves over time
    Trend,
    /// A single headline number
    Metric,
    /// Something that probably needs attention
    Alert,
    /// About one specific expense
    Transaction,
    /// A recurring behaviour
    Pattern,
    /// A place to cut back
    Opportunity,
}

impl InsightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightType::Spending => "spending",
            InsightType::Trend => "trend",
            InsightType::Metric => "metric",
            InsightType::Alert => "alert",
            InsightType::Transaction => "transaction",
            InsightType::Pattern => "pattern",
            InsightType::Opportunity => "opportunity",
        }
    }
}

impl fmt::Display for InsightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InsightType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "spending" => Ok(InsightType::Spending),
            "trend" => Ok(InsightType::Trend),
            "metric" => Ok(InsightType::Metric),
            "alert" => Ok(InsightType::Alert),
            "transaction" => Ok(InsightType::Transaction),
            "pattern" => Ok(InsightType::Pattern),
            "opportunity" => Ok(InsightType::Opportunity),
            _ => Err(format!("Unknown insight type: {}", s)),
        }
    }
}

/// Priority class of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Alert,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Alert => "alert",
            Severity::Info => "info",
        }
    }

    /// Sort rank (lower = shown first)
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Warning => 0,
            Severity::Alert => 1,
            Severity::Info => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warning" => Ok(Severity::Warning),
            "alert" => Ok(Severity::Alert),
            "info" => Ok(Severity::Info),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// A generated insight.
///
/// `id` comes from the rule that produced it, never from the numbers, so the
/// same insight keeps its id when regenerated from changed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub id: String,
    #[serde(rename = "type")]
    pub insight_type: InsightType,
    pub icon: String,
    pub title: String,
    pub description: String,
    pub metric_value: f64,
    pub severity: Severity,
}
