//! Insight generation over a shared analysis context

use chrono::NaiveDateTime;

use crate::analytics::{Aggregates, SeriesStatistics, TrendReport};
use crate::config::AnalyticsConfig;
use crate::models::Expense;

use super::rules::InsightRule;
use super::types::Insight;

/// Everything a rule may look at, computed once per request
pub struct InsightContext<'a> {
    pub expenses: &'a [Expense],
    pub aggregates: Aggregates,
    /// Statistics over monthly totals; `None` when there are no months
    pub monthly_statistics: Option<SeriesStatistics>,
    pub trend: TrendReport,
    /// Reference instant for rolling windows
    pub now: NaiveDateTime,
    pub config: &'a AnalyticsConfig,
}

impl<'a> InsightContext<'a> {
    pub fn new(expenses: &'a [Expense], now: NaiveDateTime, config: &'a AnalyticsConfig) -> Self {
        let aggregates = Aggregates::from_expenses(expenses);
        let monthly: Vec<f64> = aggregates.months.iter().map(|m| m.total).collect();
        let monthly_statistics = SeriesStatistics::compute(&monthly);
        let trend = TrendReport::from_months(&aggregates.months);

        Self {
            expenses,
            aggregates,
            monthly_statistics,
            trend,
            now,
            config,
        }
    }

    /// Mean amount per expense, `None` without expenses
    pub fn mean_amount(&self) -> Option<f64> {
        if self.expenses.is_empty() {
            return None;
        }
        let total: f64 = self.expenses.iter().map(|e| e.amount).sum();
        Some(total / self.expenses.len() as f64)
    }

    /// Format an amount for insight text
    pub fn money(&self, amount: f64) -> String {
        format!("{}{:.2}", self.config.currency_symbol, amount)
    }
}

/// Runs a fixed list of rules and orders the results by severity
pub struct InsightGenerator {
    rules: Vec<InsightRule>,
}

impl Default for InsightGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightGenerator {
    /// Generator with every built-in rule
    pub fn new() -> Self {
        Self {
            rules: InsightRule::ALL.to_vec(),
        }
    }

    /// Generator restricted to `rules`, evaluated in the given order
    pub fn with_rules(rules: Vec<InsightRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[InsightRule] {
        &self.rules
    }

    /// Evaluate every rule and return insights ordered warning, alert, info.
    /// Rule order is kept within a severity.
    pub fn generate(&self, ctx: &InsightContext<'_>) -> Vec<Insight> {
        let mut insights = Vec::new();

        for rule in &self.rules {
            match rule.evaluate(ctx) {
                Some(insight) => {
                    tracing::debug!(
                        insight = rule.id(),
                        severity = %insight.severity,
                        "Insight generated"
                    );
                    insights.push(insight);
                }
                None => {
                    tracing::debug!(insight = rule.id(), "Insight rule skipped");
                }
            }
        }

        // sort_by_key is stable
        insights.sort_by_key(|i| i.severity.rank());

        tracing::debug!(count = insights.len(), "Insights generated");
        insights
    }
}

/// Drop insights whose id is in `dismissed`
pub fn filter_dismissed<'a, I>(insights: Vec<Insight>, dismissed: I) -> Vec<Insight>
where
    I: IntoIterator<Item = &'a str>,
{
    let dismissed: std::collections::HashSet<&str> = dismissed.into_iter().collect();
    insights
        .into_iter()
        .filter(|i| !dismissed.contains(i.id.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::types::Severity;
    use chrono::{NaiveDate, Utc};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
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
    fn test_no_expenses_no_insights() {
        let config = AnalyticsConfig::default();
        let ctx = InsightContext::new(&[], at(2024, 3, 1), &config);
        assert!(ctx.monthly_statistics.is_none());
        assert!(InsightGenerator::new().generate(&ctx).is_empty());
    }

    #[test]
    fn test_warnings_sorted_first_and_rule_order_kept() {
        let config = AnalyticsConfig::default();
        let expenses = vec![
            expense(1, "Travel", 5000.0, at(2024, 3, 2)),
            expense(2, "Food", 100.0, at(2024, 3, 3)),
        ];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let insights = InsightGenerator::new().generate(&ctx);

        let ids: Vec<&str> = insights.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "daily-average",
                "high-spending",
                "top-category",
                "max-expense",
                "diversity",
                "expensive-day",
                "savings-opportunity",
            ]
        );

        let ranks: Vec<u8> = insights.iter().map(|i| i.severity.rank()).collect();
        let mut sorted = ranks.clone();
        sorted.sort();
        assert_eq!(ranks, sorted);
        assert_eq!(insights[0].severity, Severity::Warning);
    }

    #[test]
    fn test_ids_are_stable_across_data_changes() {
        let config = AnalyticsConfig::default();
        let first = vec![expense(1, "Food", 100.0, at(2024, 3, 2))];
        let second = vec![
            expense(1, "Bills", 900.0, at(2024, 1, 2)),
            expense(2, "Food", 50.0, at(2024, 2, 9)),
        ];

        let ids = |expenses: &[Expense]| -> Vec<String> {
            let ctx = InsightContext::new(expenses, at(2024, 3, 31), &config);
            let mut ids: Vec<String> = InsightGenerator::new()
                .generate(&ctx)
                .into_iter()
                .map(|i| i.id)
                .collect();
            ids.sort();
            ids
        };

        let a = ids(&first);
        let b = ids(&second);
        assert!(a.contains(&"top-category".to_string()));
        assert!(b.contains(&"top-category".to_string()));
    }

    #[test]
    fn test_filter_dismissed() {
        let config = AnalyticsConfig::default();
        let expenses = vec![expense(1, "Food", 100.0, at(2024, 3, 2))];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let insights = InsightGenerator::new().generate(&ctx);
        let before = insights.len();

        let filtered = filter_dismissed(insights, ["top-category", "not-a-rule"]);
        assert_eq!(filtered.len(), before - 1);
        assert!(filtered.iter().all(|i| i.id != "top-category"));
    }

    #[test]
    fn test_restricted_generator() {
        let config = AnalyticsConfig::default();
        let expenses = vec![expense(1, "Food", 100.0, at(2024, 3, 2))];
        let ctx = InsightContext::new(&expenses, at(2024, 3, 31), &config);
        let generator = InsightGenerator::with_rules(vec![InsightRule::CategoryDiversity]);
        let insights = generator.generate(&ctx);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].id, "diversity");
    }
}
