//! The built-in insight rules
//!
//! Each rule is a pure function of the [`InsightContext`] and produces at most
//! one insight. A rule that has nothing meaningful to say (no expenses, no
//! baseline window, threshold not reached) returns `None`.

use serde::{Deserialize, Serialize};

use crate::analytics::{aggregate_by_weekday, compare_windows, weekday_name, Direction};

use super::engine::InsightContext;
use super::types::{Insight, InsightType, Severity};

/// Closed set of insight rules, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightRule {
    TopCategory,
    SpendingTrend,
    AverageExpense,
    HighAverage,
    LargestExpense,
    CategoryDiversity,
    ExpensiveWeekday,
    SavingsOpportunity,
}

impl InsightRule {
    /// Every rule, in the order insights are generated
    pub const ALL: [InsightRule; 8] = [
        InsightRule::TopCategory,
        InsightRule::SpendingTrend,
        InsightRule::AverageExpense,
        InsightRule::HighAverage,
        InsightRule::LargestExpense,
        InsightRule::CategoryDiversity,
        InsightRule::ExpensiveWeekday,
        InsightRule::SavingsOpportunity,
    ];

    /// Stable insight id. Persisted save/dismiss state refers to these strings,
    /// so they must never change.
    pub fn id(&self) -> &'static str {
        match self {
            InsightRule::TopCategory => "top-category",
            InsightRule::SpendingTrend => "spending-trend",
            InsightRule::AverageExpense => "daily-average",
            InsightRule::HighAverage => "high-spending",
            InsightRule::LargestExpense => "max-expense",
            InsightRule::CategoryDiversity => "diversity",
            InsightRule::ExpensiveWeekday => "expensive-day",
            InsightRule::SavingsOpportunity => "savings-opportunity",
        }
    }

    /// Rule for a persisted insight id
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rule| rule.id() == id)
    }

    pub fn insight_type(&self) -> InsightType {
        match self {
            InsightRule::TopCategory => InsightType::Spending,
            InsightRule::SpendingTrend => InsightType::Trend,
            InsightRule::AverageExpense => InsightType::Metric,
            InsightRule::HighAverage => InsightType::Alert,
            InsightRule::LargestExpense => InsightType::Transaction,
            InsightRule::CategoryDiversity => InsightType::Metric,
            InsightRule::ExpensiveWeekday => InsightType::Pattern,
            InsightRule::SavingsOpportunity => InsightType::Opportunity,
        }
    }

    /// Human-readable rule name
    pub fn name(&self) -> &'static str {
        match self {
            InsightRule::TopCategory => "Top category",
            InsightRule::SpendingTrend => "Recent spending trend",
            InsightRule::AverageExpense => "Average expense",
            InsightRule::HighAverage => "High average alert",
            InsightRule::LargestExpense => "Largest transaction",
            InsightRule::CategoryDiversity => "Category diversity",
            InsightRule::ExpensiveWeekday => "Most expensive weekday",
            InsightRule::SavingsOpportunity => "Savings opportunity",
        }
    }

    /// Run this rule against the context
    pub fn evaluate(&self, ctx: &InsightContext<'_>) -> Option<Insight> {
        match self {
            InsightRule::TopCategory => top_category(ctx),
            InsightRule::SpendingTrend => spending_trend(ctx),
            InsightRule::AverageExpense => average_expense(ctx),
            InsightRule::HighAverage => high_average(ctx),
            InsightRule::LargestExpense => largest_expense(ctx),
            InsightRule::CategoryDiversity => category_diversity(ctx),
            InsightRule::ExpensiveWeekday => expensive_weekday(ctx),
            InsightRule::SavingsOpportunity => savings_opportunity(ctx),
        }
    }

    fn build(
        &self,
        icon: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        metric_value: f64,
        severity: Severity,
    ) -> Insight {
        Insight {
            id: self.id().to_string(),
            insight_type: self.insight_type(),
            icon: icon.to_string(),
            title: title.into(),
            description: description.into(),
            metric_value,
            severity,
        }
    }
}

fn top_category(ctx: &InsightContext<'_>) -> Option<Insight> {
    let top = ctx.aggregates.categories.first()?;
    let total = ctx.aggregates.total();
    let share = if total > 0.0 {
        top.total / total * 100.0
    } else {
        0.0
    };

    Some(InsightRule::TopCategory.build(
        "🏆",
        "Top Spending Category",
        format!(
            "Your highest spending is on {} with {}. That is {:.1}% of everything you spent.",
            top.category,
            ctx.money(top.total),
            share
        ),
        top.total,
        Severity::Info,
    ))
}

fn spending_trend(ctx: &InsightContext<'_>) -> Option<Insight> {
    if ctx.expenses.len() < 2 {
        return None;
    }

    let window = ctx.config.recent_window_days;
    let cmp = compare_windows(ctx.expenses, ctx.now, window);
    if !cmp.has_baseline() {
        return None;
    }

    let severity = if cmp.percent_change.abs() > ctx.config.trend_warning_percent {
        Severity::Warning
    } else {
        Severity::Info
    };

    let (icon, title, verb) = match cmp.direction {
        Direction::Up => ("📈", "Spending is increasing", "increased"),
        Direction::Down => ("📉", "Spending is decreasing", "decreased"),
    };

    Some(InsightRule::SpendingTrend.build(
        icon,
        title,
        format!(
            "Your spending {} by {:.1}% compared to the previous {} days. Last {} days: {}, previous {} days: {}.",
            verb,
            cmp.percent_change.abs(),
            window,
            window,
            ctx.money(cmp.current_total),
            window,
            ctx.money(cmp.previous_total)
        ),
        cmp.percent_change.abs(),
        severity,
    ))
}

fn average_expense(ctx: &InsightContext<'_>) -> Option<Insight> {
    let mean = ctx.mean_amount()?;
    let severity = if mean > ctx.config.average_warning_threshold {
        Severity::Warning
    } else {
        Severity::Info
    };

    Some(InsightRule::AverageExpense.build(
        "💰",
        "Average Expense",
        format!(
            "Your average expense is {} across {} expenses.",
            ctx.money(mean),
            ctx.expenses.len()
        ),
        mean,
        severity,
    ))
}

fn high_average(ctx: &InsightContext<'_>) -> Option<Insight> {
    let mean = ctx.mean_amount()?;
    if mean <= ctx.config.high_average_threshold {
        return None;
    }

    Some(InsightRule::HighAverage.build(
        "⚠️",
        "High Average Expense Alert",
        format!(
            "Your average expense amount is {}, which is higher than typical. Consider reviewing your spending.",
            ctx.money(mean)
        ),
        mean,
        Severity::Warning,
    ))
}

fn largest_expense(ctx: &InsightContext<'_>) -> Option<Insight> {
    // First expense wins on equal amounts
    let largest = ctx
        .expenses
        .iter()
        .reduce(|max, e| if e.amount > max.amount { e } else { max })?;

    let note = largest
        .notes
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .map(|n| format!(" ({})", n))
        .unwrap_or_default();

    Some(InsightRule::LargestExpense.build(
        "💸",
        "Largest Transaction",
        format!(
            "Your highest single expense was {} for {}{} on {}.",
            ctx.money(largest.amount),
            largest.category,
            note,
            largest.date.format("%Y-%m-%d")
        ),
        largest.amount,
        Severity::Info,
    ))
}

fn category_diversity(ctx: &InsightContext<'_>) -> Option<Insight> {
    let count = ctx.aggregates.categories.len();
    if count == 0 {
        return None;
    }

    let description = if count == 1 {
        "All of your spending falls into a single category.".to_string()
    } else {
        format!("You spend across {} different categories.", count)
    };

    Some(InsightRule::CategoryDiversity.build(
        "🎯",
        "Spending Diversity",
        description,
        count as f64,
        Severity::Info,
    ))
}

fn expensive_weekday(ctx: &InsightContext<'_>) -> Option<Insight> {
    // Sunday-first order, so ties go to the earlier weekday
    let busiest = aggregate_by_weekday(ctx.expenses)
        .into_iter()
        .reduce(|max, d| if d.total > max.total { d } else { max })?;

    let day = weekday_name(busiest.weekday);
    let per_expense = busiest.total / busiest.count as f64;

    Some(InsightRule::ExpensiveWeekday.build(
        "📅",
        format!("{} is Your Most Expensive Day", day),
        format!(
            "{}s have the highest total spending at {}, averaging {} per expense.",
            day,
            ctx.money(busiest.total),
            ctx.money(per_expense)
        ),
        busiest.total,
        Severity::Info,
    ))
}

fn savings_opportunity(ctx: &InsightContext<'_>) -> Option<Insight> {
    // Highest average per transaction, not highest total. Categories are
    // ordered by total, so equal averages go to the larger category.
    let candidate = ctx
        .aggregates
        .categories
        .iter()
        .reduce(|best, c| if c.average() > best.average() { c } else { best })?;

    Some(InsightRule::SavingsOpportunity.build(
        "💡",
        "Savings Opportunity",
        format!(
            "{} has the highest average expense per transaction ({}). Look for ways to reduce spending here.",
            candidate.category,
            ctx.money(candidate.average())
        ),
        candidate.average(),
        Severity::Info,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::models::Expense;
    use chrono::{NaiveDate, NaiveDateTime, Utc};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn expense(id: i64, category: &str, amount: f64, date: NaiveDateTime) -> Expense {
        Expense {
            id,
            owner_id: "owner".to_string(),
            amount,
            category: category.to_string(),
            payment_mode: None,
            date,
            notes: None,
            envelope_id: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_ids_are_unique_and_resolvable() {
        let mut ids: Vec<&str> = InsightRule::ALL.iter().map(|r| r.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), InsightRule::ALL.len());

        for rule in InsightRule::ALL {
            assert_eq!(InsightRule::from_id(rule.id()), Some(rule));
        }
        assert_eq!(InsightRule::from_id("nope"), None);
    }

    #[test]
    fn test_empty_context_produces_nothing() {
        let config = AnalyticsConfig::default();
        let ctx = InsightContext::new(&[], at(2024, 3, 1), &config);
        for rule in InsightRule::ALL {
            assert!(rule.evaluate(&ctx).is_none(), "{} fired", rule.name());
        }
    }

    #[test]
    fn test_trend_requires_previous_window_spend() {
        let config = AnalyticsConfig::default();
        let now = at(2024, 3, 31);
        let expenses = vec![
            expense(1, "Food", 100.0, at(2024, 3, 20)),
            expense(2, "Food", 100.0, at(2024, 3, 21)),
        ];
        let ctx = InsightContext::new(&expenses, now, &config);
        assert!(InsightRule::SpendingTrend.evaluate(&ctx).is_none());
    }

    #[test]
    fn test_trend_with_oversized_window_is_skipped() {
        // Config is normally validated on load; a hand-built one can still be out of range
        let config = AnalyticsConfig {
            recent_window_days: 100_000_000,
            ..AnalyticsConfig::default()
        };
        let now = at(2024, 3, 31);
        let expenses = vec![
            expense(1, "Food", 50.0, at(2024, 3, 20)),
            expense(2, "Food", 100.0, at(2024, 2, 20)),
        ];
        let ctx = InsightContext::new(&expenses, now, &config);
        assert!(InsightRule::SpendingTrend.evaluate(&ctx).is_none());
    }

    #[test]
    fn test_trend_warning_on_large_decrease() {
        let config = AnalyticsConfig::default();
        let now = at(2024, 3, 31);
        let expenses = vec![
            expense(1, "Food", 50.0, at(2024, 3, 20)),
            expense(2, "Food", 100.0, at(2024, 2, 20)),
        ];
        let ctx = InsightContext::new(&expenses, now, &config);
        let insight = InsightRule::SpendingTrend.evaluate(&ctx).unwrap();
        assert_eq!(insight.id, "spending-trend");
        assert_eq!(insight.severity, Severity::Warning);
        assert_eq!(insight.title, "Spending is decreasing");
        assert!((insight.metric_value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_trend_small_increase_is_info() {
        let config = AnalyticsConfig::default();
        let now = at(2024, 3, 31);
        let expenses = vec![
            expense(1, "Food", 110.0, at(2024, 3, 20)),
            expense(2, "Food", 100.0, at(2024, 2, 20)),
        ];
        let ctx = InsightContext::new(&expenses, now, &config);
        let insight = InsightRule::SpendingTrend.evaluate(&ctx).unwrap();
        assert_eq!(insight.severity, Severity::Info);
        assert_eq!(insight.icon, "📈");
    }

    #[test]
    fn test_average_thresholds() {
        let config = AnalyticsConfig::default();
        let now = at(2024, 3, 31);

        let modest = vec![expense(1, "Food", 999.0, at(2024, 3, 1))];
        let ctx = InsightContext::new(&modest, now, &config);
        assert_eq!(
            InsightRule::AverageExpense.evaluate(&ctx).unwrap().severity,
            Severity::Info
        );
        assert!(InsightRule::HighAverage.evaluate(&ctx).is_none());

        let large = vec![
            expense(1, "Travel", 3000.0, at(2024, 3, 1)),
            expense(2, "Travel", 1500.0, at(2024, 3, 2)),
        ];
        let ctx = InsightContext::new(&large, now, &config);
        let avg = InsightRule::AverageExpense.evaluate(&ctx).unwrap();
        assert_eq!(avg.severity, Severity::Warning);
        assert!((avg.metric_value - 2250.0).abs() < 1e-9);

        let alert = InsightRule::HighAverage.evaluate(&ctx).unwrap();
        assert_eq!(alert.id, "high-spending");
        assert_eq!(alert.severity, Severity::Warning);
    }

    #[test]
    fn test_high_average_threshold_is_exclusive() {
        let config = AnalyticsConfig::default();
        let expenses = vec![expense(1, "Rent", 2000.0, at(2024, 3, 1))];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        assert!(InsightRule::HighAverage.evaluate(&ctx).is_none());
    }

    #[test]
    fn test_largest_expense_includes_notes_and_keeps_first_on_tie() {
        let config = AnalyticsConfig::default();
        let mut first = expense(1, "Shopping", 500.0, at(2024, 3, 2));
        first.notes = Some("new shoes".to_string());
        let second = expense(2, "Bills", 500.0, at(2024, 3, 1));
        let expenses = vec![first, second];

        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let insight = InsightRule::LargestExpense.evaluate(&ctx).unwrap();
        assert!(insight.description.contains("Shopping (new shoes)"));
        assert_eq!(insight.metric_value, 500.0);
    }

    #[test]
    fn test_expensive_weekday() {
        let config = AnalyticsConfig::default();
        // 2024-03-02 and 2024-03-09 are Saturdays, 2024-03-04 is a Monday
        let expenses = vec![
            expense(1, "Food", 100.0, at(2024, 3, 2)),
            expense(2, "Food", 300.0, at(2024, 3, 9)),
            expense(3, "Food", 350.0, at(2024, 3, 4)),
        ];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let insight = InsightRule::ExpensiveWeekday.evaluate(&ctx).unwrap();
        assert_eq!(insight.title, "Saturday is Your Most Expensive Day");
        assert_eq!(insight.metric_value, 400.0);
        assert!(insight.description.contains("₹200"));
    }

    #[test]
    fn test_savings_uses_average_not_total() {
        let config = AnalyticsConfig::default();
        let expenses = vec![
            expense(1, "Food", 100.0, at(2024, 3, 1)),
            expense(2, "Food", 100.0, at(2024, 3, 2)),
            expense(3, "Food", 100.0, at(2024, 3, 3)),
            expense(4, "Electronics", 250.0, at(2024, 3, 4)),
        ];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);

        let top = InsightRule::TopCategory.evaluate(&ctx).unwrap();
        assert!(top.description.contains("Food"));

        let savings = InsightRule::SavingsOpportunity.evaluate(&ctx).unwrap();
        assert!(savings.description.starts_with("Electronics"));
        assert_eq!(savings.metric_value, 250.0);
    }

    #[test]
    fn test_diversity_counts_distinct_categories() {
        let config = AnalyticsConfig::default();
        let expenses = vec![
            expense(1, "Food", 1.0, at(2024, 3, 1)),
            expense(2, "Bills", 1.0, at(2024, 3, 2)),
            expense(3, "Food", 1.0, at(2024, 3, 3)),
        ];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let insight = InsightRule::CategoryDiversity.evaluate(&ctx).unwrap();
        assert_eq!(insight.metric_value, 2.0);
    }
}
