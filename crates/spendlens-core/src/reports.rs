//! Report builders
//!
//! Turns analytics results into the shapes handed to callers. This is the only
//! place amounts are rounded; everything upstream keeps full precision.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::analytics::{
    aggregate_by_category, aggregate_by_month, aggregate_by_payment_mode, aggregate_by_weekday,
    aggregate_by_year, compare_calendar_months, weekday_name, BudgetProgress, DistributionBucket,
    SeriesStatistics, TrendReport,
};
use crate::models::*;

/// Round to 2 decimal places for display
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a percentage with exactly 2 decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.2}", value)
}

/// Category totals, largest first
pub fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryBreakdownRow> {
    aggregate_by_category(expenses)
        .into_iter()
        .map(|c| CategoryBreakdownRow {
            category: c.category,
            total: round2(c.total),
            count: c.count,
        })
        .collect()
}

/// Month totals, oldest first
pub fn monthly_summary(expenses: &[Expense]) -> Vec<MonthlySummaryRow> {
    aggregate_by_month(expenses)
        .into_iter()
        .map(|m| MonthlySummaryRow {
            month: m.month,
            total: round2(m.total),
            count: m.count,
        })
        .collect()
}

/// Year totals, most recent first
pub fn yearly_summary(expenses: &[Expense]) -> Vec<YearlySummaryRow> {
    aggregate_by_year(expenses)
        .into_iter()
        .map(|y| YearlySummaryRow {
            year: y.year,
            total: round2(y.total),
            count: y.count,
        })
        .collect()
}

pub fn payment_mode_breakdown(expenses: &[Expense]) -> Vec<PaymentModeRow> {
    aggregate_by_payment_mode(expenses)
        .into_iter()
        .map(|m| PaymentModeRow {
            payment_mode: m.payment_mode,
            total: round2(m.total),
            count: m.count,
        })
        .collect()
}

/// Weekday totals, Sunday first
pub fn weekday_breakdown(expenses: &[Expense]) -> Vec<WeekdayRow> {
    aggregate_by_weekday(expenses)
        .into_iter()
        .map(|d| WeekdayRow {
            weekday: weekday_name(d.weekday).to_string(),
            total: round2(d.total),
            count: d.count,
        })
        .collect()
}

/// Each category's percentage of total spending
pub fn category_shares(expenses: &[Expense]) -> Vec<CategoryShare> {
    let categories = aggregate_by_category(expenses);
    let total: f64 = categories.iter().map(|c| c.total).sum();

    categories
        .into_iter()
        .map(|c| {
            let percentage = if total > 0.0 {
                c.total / total * 100.0
            } else {
                0.0
            };
            CategoryShare {
                category: c.category,
                total: round2(c.total),
                percentage: round2(percentage),
            }
        })
        .collect()
}

/// Headline totals. An empty expense set yields zeros and an empty map.
pub fn dashboard_summary(expenses: &[Expense]) -> DashboardSummary {
    let total: f64 = expenses.iter().map(|e| e.amount).sum();
    let count = expenses.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };

    let category_breakdown: BTreeMap<String, CategoryTotals> = aggregate_by_category(expenses)
        .into_iter()
        .map(|c| {
            (
                c.category,
                CategoryTotals {
                    count: c.count,
                    total: round2(c.total),
                },
            )
        })
        .collect();

    DashboardSummary {
        total_spending: round2(total),
        expense_count: count,
        average_expense: round2(average),
        category_breakdown,
    }
}

/// Total, count, average, min and max of individual expense amounts
pub fn spending_summary(expenses: &[Expense]) -> SpendingSummary {
    if expenses.is_empty() {
        return SpendingSummary::default();
    }

    let amounts = expenses.iter().map(|e| e.amount);
    let total: f64 = amounts.clone().sum();
    let min = amounts.clone().fold(f64::INFINITY, f64::min);
    let max = amounts.fold(f64::NEG_INFINITY, f64::max);

    SpendingSummary {
        total: round2(total),
        count: expenses.len(),
        average: round2(total / expenses.len() as f64),
        min: round2(min),
        max: round2(max),
    }
}

/// Budget progress with the percentage rendered as a 2-decimal string
pub fn envelope_analytics(progress: &BudgetProgress) -> EnvelopeAnalytics {
    EnvelopeAnalytics {
        total_spent: round2(progress.total_spent),
        budget: round2(progress.budget),
        remaining: round2(progress.remaining),
        percentage: format_percent(progress.percentage),
        is_over_budget: progress.is_over_budget,
    }
}

/// Envelope detail from an envelope and the expenses linked to it
pub fn envelope_detail(envelope: Envelope, expenses: Vec<Expense>) -> EnvelopeDetail {
    let progress = BudgetProgress::for_envelope(&envelope, &expenses);
    EnvelopeDetail {
        analytics: envelope_analytics(&progress),
        envelope,
        expenses,
    }
}

/// This calendar month against the previous one, with a one-line summary
pub fn period_comparison(expenses: &[Expense], today: NaiveDate) -> PeriodComparison {
    let cmp = compare_calendar_months(expenses, today);

    let insight = if cmp.percent_change > 0.0 {
        format!(
            "You spent {:.1}% more this month compared to last month.",
            cmp.percent_change.abs()
        )
    } else if cmp.percent_change < 0.0 {
        format!(
            "Great! You spent {:.1}% less this month compared to last month.",
            cmp.percent_change.abs()
        )
    } else {
        "Your spending this month is similar to last month.".to_string()
    };

    PeriodComparison {
        this_month_total: round2(cmp.current_total),
        last_month_total: round2(cmp.previous_total),
        percentage_change: format_percent(cmp.percent_change),
        insight,
    }
}

/// Statistics over monthly totals; `None` when there are no expenses
pub fn spending_statistics(expenses: &[Expense]) -> Option<SpendingStatisticsReport> {
    let totals: Vec<f64> = aggregate_by_month(expenses)
        .iter()
        .map(|m| m.total)
        .collect();
    let stats = SeriesStatistics::compute(&totals)?;

    let mut distribution = DistributionCounts::default();
    for bucket in stats.distribution(&totals) {
        match bucket {
            DistributionBucket::Low => distribution.low += 1,
            DistributionBucket::Medium => distribution.medium += 1,
            DistributionBucket::High => distribution.high += 1,
            DistributionBucket::VeryHigh => distribution.very_high += 1,
        }
    }

    Some(SpendingStatisticsReport {
        months: stats.count,
        max: round2(stats.max),
        min: round2(stats.min),
        mean: round2(stats.mean),
        median: round2(stats.median),
        variance: round2(stats.variance),
        std_dev: round2(stats.std_dev),
        range: round2(stats.range),
        distribution,
    })
}

/// Month-over-month change and deviation from the average month
pub fn spending_patterns(expenses: &[Expense]) -> Vec<SpendingPatternRow> {
    let report = TrendReport::from_months(&aggregate_by_month(expenses));

    report
        .periods
        .iter()
        .zip(report.comparisons.iter())
        .map(|(period, cmp)| SpendingPatternRow {
            month: period.period.clone(),
            total: round2(period.total),
            percent_change: round2(period.percent_change),
            direction: period.direction.to_string(),
            running_average: round2(cmp.running_average),
            variance: round2(cmp.variance),
        })
        .collect()
}

/// Largest expenses first; equal amounts keep the input (newest-first) order
pub fn top_expenses(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDateTime, Utc};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn expense(category: &str, amount: f64, date: NaiveDateTime) -> Expense {
        Expense {
            id: 0,
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
    fn test_round2() {
        assert_eq!(round2(10.0 / 3.0), 3.33);
        assert_eq!(round2(2.675_1), 2.68);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(format_percent(50.0), "50.00");
    }

    #[test]
    fn test_empty_dashboard_is_zeroed() {
        let summary = dashboard_summary(&[]);
        assert_eq!(summary.total_spending, 0.0);
        assert_eq!(summary.expense_count, 0);
        assert_eq!(summary.average_expense, 0.0);
        assert!(summary.category_breakdown.is_empty());

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["categoryBreakdown"], serde_json::json!({}));
    }

    #[test]
    fn test_dashboard_totals() {
        let expenses = vec![
            expense("Food", 10.0, at(2024, 1, 1)),
            expense("Food", 20.0, at(2024, 1, 2)),
            expense("Bills", 0.01, at(2024, 1, 3)),
        ];
        let summary = dashboard_summary(&expenses);
        assert_eq!(summary.total_spending, 30.01);
        assert_eq!(summary.expense_count, 3);
        assert_eq!(summary.average_expense, 10.0);
        assert_eq!(summary.category_breakdown["Food"].count, 2);
        assert_eq!(summary.category_breakdown["Food"].total, 30.0);
    }

    #[test]
    fn test_rounding_happens_after_summing() {
        // Three thirds round individually to 0.33 each, but sum to 1.00
        let third = 1.0 / 3.0;
        let expenses = vec![
            expense("Food", third, at(2024, 1, 1)),
            expense("Food", third, at(2024, 1, 2)),
            expense("Food", third, at(2024, 1, 3)),
        ];
        assert_eq!(category_breakdown(&expenses)[0].total, 1.0);
    }

    #[test]
    fn test_envelope_percentage_string() {
        let progress = BudgetProgress::compute(300.0, 100.0);
        let analytics = envelope_analytics(&progress);
        assert_eq!(analytics.percentage, "33.33");
        assert_eq!(analytics.remaining, 200.0);

        let zero = envelope_analytics(&BudgetProgress::compute(0.0, 5.0));
        assert_eq!(zero.percentage, "0.00");
        assert!(zero.is_over_budget);
    }

    #[test]
    fn test_period_comparison_messages() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();

        let more = period_comparison(
            &[
                expense("Food", 150.0, at(2024, 3, 1)),
                expense("Food", 100.0, at(2024, 2, 10)),
            ],
            today,
        );
        assert_eq!(more.percentage_change, "50.00");
        assert_eq!(
            more.insight,
            "You spent 50.0% more this month compared to last month."
        );

        let less = period_comparison(
            &[
                expense("Food", 25.0, at(2024, 3, 1)),
                expense("Food", 100.0, at(2024, 2, 10)),
            ],
            today,
        );
        assert!(less.insight.starts_with("Great! You spent 75.0% less"));

        let none = period_comparison(&[expense("Food", 25.0, at(2024, 3, 1))], today);
        assert_eq!(none.percentage_change, "0.00");
        assert_eq!(
            none.insight,
            "Your spending this month is similar to last month."
        );
    }

    #[test]
    fn test_spending_statistics_distribution() {
        let expenses = vec![
            expense("Food", 50.0, at(2024, 1, 1)),
            expense("Food", 50.0, at(2024, 2, 1)),
            expense("Food", 50.0, at(2024, 3, 1)),
        ];
        let stats = spending_statistics(&expenses).unwrap();
        assert_eq!(stats.months, 3);
        assert_eq!(stats.variance, 0.0);
        assert_eq!(stats.distribution.medium, 3);

        assert!(spending_statistics(&[]).is_none());
    }

    #[test]
    fn test_spending_patterns() {
        let expenses = vec![
            expense("Food", 100.0, at(2024, 1, 1)),
            expense("Food", 100.0, at(2024, 2, 1)),
        ];
        let rows = spending_patterns(&expenses);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].percent_change, 0.0);
        assert_eq!(rows[1].direction, "down");
        assert_eq!(rows[1].running_average, 100.0);
    }

    #[test]
    fn test_category_shares_and_top_expenses() {
        let expenses = vec![
            expense("Food", 75.0, at(2024, 1, 1)),
            expense("Bills", 25.0, at(2024, 1, 2)),
        ];
        let shares = category_shares(&expenses);
        assert_eq!(shares[0].percentage, 75.0);
        assert_eq!(shares[1].percentage, 25.0);

        let top = top_expenses(&expenses, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].category, "Food");
    }

    #[test]
    fn test_spending_summary() {
        assert_eq!(spending_summary(&[]), SpendingSummary::default());

        let summary = spending_summary(&[
            expense("Food", 10.0, at(2024, 1, 1)),
            expense("Food", 30.0, at(2024, 1, 2)),
        ]);
        assert_eq!(summary.total, 40.0);
        assert_eq!(summary.average, 20.0);
        assert_eq!(summary.min, 10.0);
        assert_eq!(summary.max, 30.0);
    }
}
