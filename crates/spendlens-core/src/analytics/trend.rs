//! Period-over-period trends and rolling window comparisons

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::aggregate::MonthAggregate;
use crate::models::Expense;

/// Direction of change between two periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    /// Any change that is not strictly positive, including exactly zero
    Down,
}

impl Direction {
    /// `Up` only for a strictly positive change; zero counts as `Down`
    pub fn from_change(percent_change: f64) -> Self {
        if percent_change > 0.0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Percent change from `previous` to `current`; 0 when `previous` is 0
pub fn percent_change(previous: f64, current: f64) -> f64 {
    if previous != 0.0 {
        (current - previous) / previous * 100.0
    } else {
        0.0
    }
}

/// One period with its change from the period before
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTrend {
    pub period: String,
    pub total: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

/// One period compared with the mean of the whole window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageComparison {
    pub period: String,
    pub current: f64,
    pub running_average: f64,
    /// `current - running_average`
    pub variance: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub periods: Vec<PeriodTrend>,
    pub comparisons: Vec<AverageComparison>,
    pub running_average: f64,
}

impl TrendReport {
    /// Analyze chronologically ordered month totals.
    ///
    /// The first period has no predecessor and is reported with a change of 0
    /// (and therefore direction `Down`).
    pub fn from_months(months: &[MonthAggregate]) -> Self {
        if months.is_empty() {
            return Self::default();
        }

        let periods = months
            .iter()
            .enumerate()
            .map(|(i, month)| {
                let change = if i == 0 {
                    0.0
                } else {
                    percent_change(months[i - 1].total, month.total)
                };
                PeriodTrend {
                    period: month.month.clone(),
                    total: month.total,
                    percent_change: change,
                    direction: Direction::from_change(change),
                }
            })
            .collect();

        let running_average = months.iter().map(|m| m.total).sum::<f64>() / months.len() as f64;

        let comparisons = months
            .iter()
            .map(|month| AverageComparison {
                period: month.month.clone(),
                current: month.total,
                running_average,
                variance: month.total - running_average,
            })
            .collect();

        Self {
            periods,
            comparisons,
            running_average,
        }
    }

    /// The most recent period, if any
    pub fn latest(&self) -> Option<&PeriodTrend> {
        self.periods.last()
    }
}

/// Two adjacent windows of spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowComparison {
    pub current_total: f64,
    pub previous_total: f64,
    pub percent_change: f64,
    pub direction: Direction,
}

impl WindowComparison {
    fn new(previous_total: f64, current_total: f64) -> Self {
        let change = percent_change(previous_total, current_total);
        Self {
            current_total,
            previous_total,
            percent_change: change,
            direction: Direction::from_change(change),
        }
    }

    /// Whether the earlier window had any spending to compare against
    pub fn has_baseline(&self) -> bool {
        self.previous_total != 0.0
    }
}

/// Compare the last `window_days` days before `now` with the window before it.
///
/// The current window is everything dated at or after `now - window_days`;
/// the previous window is `[now - 2*window_days, now - window_days)`.
///
/// A window start that falls outside the representable date range leaves
/// that window unbounded, so an oversized current window has no baseline.
pub fn compare_windows(expenses: &[Expense], now: NaiveDateTime, window_days: i64) -> WindowComparison {
    let window = Duration::try_days(window_days);
    let current_start = window.and_then(|w| now.checked_sub_signed(w));
    let previous_start = current_start
        .zip(window)
        .and_then(|(start, w)| start.checked_sub_signed(w));

    let mut current = 0.0;
    let mut previous = 0.0;
    for expense in expenses {
        if current_start.map_or(true, |start| expense.date >= start) {
            current += expense.amount;
        } else if previous_start.map_or(true, |start| expense.date >= start) {
            previous += expense.amount;
        }
    }

    WindowComparison::new(previous, current)
}

/// Compare the calendar month containing `today` (up to and including today's
/// expenses and anything later) with the whole previous calendar month.
pub fn compare_calendar_months(expenses: &[Expense], today: NaiveDate) -> WindowComparison {
    let this_month_start = today.with_day(1).unwrap_or(today);
    let last_month_end = this_month_start.pred_opt().unwrap_or(this_month_start);
    let last_month_start = last_month_end.with_day(1).unwrap_or(last_month_end);

    let mut current = 0.0;
    let mut previous = 0.0;
    for expense in expenses {
        let day = expense.date.date();
        if day >= this_month_start {
            current += expense.amount;
        } else if day >= last_month_start && day <= last_month_end {
            previous += expense.amount;
        }
    }

    WindowComparison::new(previous, current)
}
