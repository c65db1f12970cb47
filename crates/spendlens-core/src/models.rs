//! Data models for Spendlens

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Maximum length of free-form expense notes
pub const MAX_NOTES_LEN: usize = 500;

/// Categories offered by default. Categories are free strings; this list only
/// seeds help text and completion.
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Healthcare",
    "Education",
    "Bills",
    "Travel",
    "Other",
];

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    CreditCard,
    DebitCard,
    Upi,
    NetBanking,
    Other,
}

impl PaymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Upi => "upi",
            Self::NetBanking => "net_banking",
            Self::Other => "other",
        }
    }

    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::Upi => "UPI",
            Self::NetBanking => "Net Banking",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for PaymentMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Accept both the storage form ("credit_card") and the label ("Credit Card")
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "cash" => Ok(Self::Cash),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "upi" => Ok(Self::Upi),
            "net_banking" => Ok(Self::NetBanking),
            "other" => Ok(Self::Other),
            _ => Err(format!("Unknown payment mode: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub owner_id: String,
    /// Always >= 0
    pub amount: f64,
    pub category: String,
    pub payment_mode: Option<PaymentMode>,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    /// Envelope (story) this expense is filed under, if any
    pub envelope_id: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A new expense to be recorded (before DB insertion)
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub payment_mode: Option<PaymentMode>,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
    pub envelope_id: Option<i64>,
}

impl NewExpense {
    /// Convenience constructor for the common case (no payment mode, notes or envelope)
    pub fn new(amount: f64, category: impl Into<String>, date: NaiveDateTime) -> Self {
        Self {
            amount,
            category: category.into(),
            payment_mode: None,
            date,
            notes: None,
            envelope_id: None,
        }
    }

    pub fn with_payment_mode(mut self, mode: PaymentMode) -> Self {
        self.payment_mode = Some(mode);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_envelope(mut self, envelope_id: i64) -> Self {
        self.envelope_id = Some(envelope_id);
        self
    }

    /// Check field constraints before the expense reaches the store
    pub fn validate(&self) -> Result<()> {
        validate_amount("amount", self.amount)?;
        if self.category.trim().is_empty() {
            return Err(Error::Validation("category is required".to_string()));
        }
        if let Some(notes) = &self.notes {
            if notes.chars().count() > MAX_NOTES_LEN {
                return Err(Error::Validation(format!(
                    "notes must be at most {} characters",
                    MAX_NOTES_LEN
                )));
            }
        }
        Ok(())
    }
}

/// A budget envelope ("story"): a named allocation over a date range
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    pub id: i64,
    pub owner_id: String,
    pub name: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// New envelope for creation or full update
#[derive(Debug, Clone)]
pub struct NewEnvelope {
    pub name: String,
    pub budget: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: Option<String>,
}

impl NewEnvelope {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("envelope name is required".to_string()));
        }
        validate_amount("budget", self.budget)?;
        if self.end_date < self.start_date {
            return Err(Error::Validation(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        Ok(())
    }
}

fn validate_amount(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Validation(format!(
            "{} must be a non-negative number (got {})",
            field, value
        )));
    }
    Ok(())
}

// ========== Report Models ==========
//
// Shapes handed to callers. Amounts here are already rounded to 2 decimals.

/// Spending for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdownRow {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

/// Spending for one calendar month ("YYYY-MM")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    pub month: String,
    pub total: f64,
    pub count: usize,
}

/// Spending for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlySummaryRow {
    pub year: i32,
    pub total: f64,
    pub count: usize,
}

/// Spending for one payment mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentModeRow {
    pub payment_mode: String,
    pub total: f64,
    pub count: usize,
}

/// Spending for one day of the week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayRow {
    pub weekday: String,
    pub total: f64,
    pub count: usize,
}

/// A category's share of total spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub total: f64,
    pub percentage: f64,
}

/// Count/total pair used inside the dashboard breakdown map
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub count: usize,
    pub total: f64,
}

/// Dashboard summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_spending: f64,
    pub expense_count: usize,
    pub average_expense: f64,
    pub category_breakdown: BTreeMap<String, CategoryTotals>,
}

/// Basic amount statistics over individual expenses
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpendingSummary {
    pub total: f64,
    pub count: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

/// Budget progress shown with an envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvelopeAnalytics {
    pub total_spent: f64,
    pub budget: f64,
    pub remaining: f64,
    /// Percent of budget used, rendered with 2 decimals
    pub percentage: String,
    pub is_over_budget: bool,
}

/// Envelope with its expenses and budget progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeDetail {
    pub envelope: Envelope,
    pub expenses: Vec<Expense>,
    pub analytics: EnvelopeAnalytics,
}

/// This calendar month vs the previous one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub this_month_total: f64,
    pub last_month_total: f64,
    /// Rendered with 2 decimals
    pub percentage_change: String,
    pub insight: String,
}

/// How many months fall in each distribution bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub very_high: usize,
}

/// Descriptive statistics over monthly totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingStatisticsReport {
    pub months: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    pub median: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub range: f64,
    pub distribution: DistributionCounts,
}

/// One month in the spending pattern report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPatternRow {
    pub month: String,
    pub total: f64,
    pub percent_change: f64,
    pub direction: String,
    pub running_average: f64,
    pub variance: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_payment_mode_parsing() {
        assert_eq!(
            PaymentMode::from_str("credit_card").unwrap(),
            PaymentMode::CreditCard
        );
        assert_eq!(
            PaymentMode::from_str("Net Banking").unwrap(),
            PaymentMode::NetBanking
        );
        assert_eq!(PaymentMode::from_str("UPI").unwrap(), PaymentMode::Upi);
        assert!(PaymentMode::from_str("barter").is_err());
    }

    #[test]
    fn test_new_expense_validation() {
        assert!(NewExpense::new(10.0, "Food", at(2024, 1, 1)).validate().is_ok());
        assert!(NewExpense::new(0.0, "Food", at(2024, 1, 1)).validate().is_ok());

        let negative = NewExpense::new(-1.0, "Food", at(2024, 1, 1));
        assert!(matches!(negative.validate(), Err(Error::Validation(_))));

        let nan = NewExpense::new(f64::NAN, "Food", at(2024, 1, 1));
        assert!(matches!(nan.validate(), Err(Error::Validation(_))));

        let blank = NewExpense::new(1.0, "  ", at(2024, 1, 1));
        assert!(matches!(blank.validate(), Err(Error::Validation(_))));

        let long_notes = NewExpense::new(1.0, "Food", at(2024, 1, 1)).with_notes("x".repeat(501));
        assert!(matches!(long_notes.validate(), Err(Error::Validation(_))));

        let max_notes = NewExpense::new(1.0, "Food", at(2024, 1, 1)).with_notes("x".repeat(500));
        assert!(max_notes.validate().is_ok());
    }

    #[test]
    fn test_new_envelope_validation() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let ok = NewEnvelope {
            name: "Trip".to_string(),
            budget: 1000.0,
            start_date: start,
            end_date: end,
            description: None,
        };
        assert!(ok.validate().is_ok());

        let inverted = NewEnvelope {
            start_date: end,
            end_date: start,
            ..ok.clone()
        };
        assert!(matches!(inverted.validate(), Err(Error::Validation(_))));

        let negative = NewEnvelope {
            budget: -5.0,
            ..ok
        };
        assert!(matches!(negative.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let summary = DashboardSummary {
            total_spending: 0.0,
            expense_count: 0,
            average_expense: 0.0,
            category_breakdown: BTreeMap::new(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalSpending"], 0.0);
        assert_eq!(json["categoryBreakdown"], serde_json::json!({}));
    }
}
