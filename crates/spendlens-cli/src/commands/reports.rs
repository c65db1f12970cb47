//! Report command implementations

use anyhow::Result;
use chrono::Local;
use spendlens_core::db::{Database, ExpenseFilter};

use super::{print_json, truncate};

/// Horizontal bar scaled against the largest value in the report
fn bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 {
        return String::new();
    }
    let filled = ((value / max).clamp(0.0, 1.0) * width as f64).round() as usize;
    "█".repeat(filled)
}

fn print_no_expenses() {
    println!("No expenses match these filters.");
}

pub fn cmd_report_categories(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.category_breakdown(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    let total: f64 = rows.iter().map(|r| r.total).sum();
    let max = rows.first().map(|r| r.total).unwrap_or(0.0);

    println!("📊 Spending by Category");
    println!();
    for row in &rows {
        println!(
            "   {:<20} {:>12.2}  {:>4}  {}",
            truncate(&row.category, 20),
            row.total,
            row.count,
            bar(row.total, max, 20)
        );
    }
    println!("   ─────────────────────────────────────");
    println!("   {:<20} {:>12.2}", "Total", total);
    Ok(())
}

pub fn cmd_report_monthly(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.monthly_summary(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    let max = rows.iter().map(|r| r.total).fold(0.0, f64::max);

    println!("📅 Spending by Month");
    println!();
    for row in &rows {
        println!(
            "   {:<8} {:>12.2}  {:>4}  {}",
            row.month,
            row.total,
            row.count,
            bar(row.total, max, 30)
        );
    }
    Ok(())
}

pub fn cmd_report_yearly(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.yearly_summary(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    println!("📅 Spending by Year");
    println!();
    for row in &rows {
        println!("   {:<6} {:>12.2}  {:>5} expenses", row.year, row.total, row.count);
    }
    Ok(())
}

pub fn cmd_report_dashboard(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let dashboard = db.dashboard_summary(owner, filter)?;
    let summary = db.spending_summary(owner, filter)?;
    if json {
        return print_json(&serde_json::json!({
            "dashboard": dashboard,
            "summary": summary,
        }));
    }

    println!("💰 Spending Dashboard");
    println!();
    println!("   Total spent:      {:>12.2}", dashboard.total_spending);
    println!("   Expenses:         {:>12}", dashboard.expense_count);
    println!("   Average expense:  {:>12.2}", dashboard.average_expense);
    if summary.count > 0 {
        println!("   Smallest:         {:>12.2}", summary.min);
        println!("   Largest:          {:>12.2}", summary.max);
    }

    if !dashboard.category_breakdown.is_empty() {
        println!();
        println!("   By category:");
        for (category, totals) in &dashboard.category_breakdown {
            println!(
                "     {:<20} {:>12.2}  ({} expenses)",
                truncate(category, 20),
                totals.total,
                totals.count
            );
        }
    }
    Ok(())
}

pub fn cmd_report_payment_modes(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.payment_mode_breakdown(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    let max = rows.first().map(|r| r.total).unwrap_or(0.0);

    println!("💳 Spending by Payment Mode");
    println!();
    for row in &rows {
        println!(
            "   {:<14} {:>12.2}  {:>4}  {}",
            row.payment_mode,
            row.total,
            row.count,
            bar(row.total, max, 20)
        );
    }
    Ok(())
}

pub fn cmd_report_weekdays(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.weekday_breakdown(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    let max = rows.iter().map(|r| r.total).fold(0.0, f64::max);

    println!("📆 Spending by Day of Week");
    println!();
    for row in &rows {
        println!(
            "   {:<10} {:>12.2}  {:>4}  {}",
            row.weekday,
            row.total,
            row.count,
            bar(row.total, max, 20)
        );
    }
    Ok(())
}

pub fn cmd_report_shares(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.category_shares(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    println!("🥧 Category Shares");
    println!();
    for row in &rows {
        println!(
            "   {:<20} {:>12.2}  {:>6.2}%  {}",
            truncate(&row.category, 20),
            row.total,
            row.percentage,
            bar(row.percentage, 100.0, 20)
        );
    }
    Ok(())
}

pub fn cmd_report_stats(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let stats = db.spending_statistics(owner, filter)?;
    if json {
        return print_json(&stats);
    }
    let Some(stats) = stats else {
        print_no_expenses();
        return Ok(());
    };

    println!("📈 Monthly Spending Statistics ({} months)", stats.months);
    println!();
    println!("   Mean:       {:>12.2}", stats.mean);
    println!("   Median:     {:>12.2}", stats.median);
    println!("   Std dev:    {:>12.2}", stats.std_dev);
    println!("   Variance:   {:>12.2}", stats.variance);
    println!("   Min:        {:>12.2}", stats.min);
    println!("   Max:        {:>12.2}", stats.max);
    println!("   Range:      {:>12.2}", stats.range);
    println!();
    println!("   Distribution of months:");
    println!("     Low:        {}", stats.distribution.low);
    println!("     Medium:     {}", stats.distribution.medium);
    println!("     High:       {}", stats.distribution.high);
    println!("     Very high:  {}", stats.distribution.very_high);
    Ok(())
}

pub fn cmd_report_trends(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    json: bool,
) -> Result<()> {
    let rows = db.spending_patterns(owner, filter)?;
    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    println!("📈 Month-over-Month Trends");
    println!();
    println!(
        "   {:<8} {:>12} {:>9}  {:>12} {:>12}",
        "Month", "Total", "Change", "Avg so far", "vs Avg"
    );
    println!("   {}", "─".repeat(58));
    for row in &rows {
        let arrow = if row.direction == "up" { "↑" } else { "↓" };
        println!(
            "   {:<8} {:>12.2} {:>7.2}% {}  {:>12.2} {:>+12.2}",
            row.month, row.total, row.percent_change, arrow, row.running_average, row.variance
        );
    }
    Ok(())
}

pub fn cmd_report_compare(db: &Database, owner: &str, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let comparison = db.period_comparison(owner, today)?;
    if json {
        return print_json(&comparison);
    }

    println!("🔁 This Month vs Last Month");
    println!();
    println!("   This month:  {:>12.2}", comparison.this_month_total);
    println!("   Last month:  {:>12.2}", comparison.last_month_total);
    println!("   Change:      {:>11}%", comparison.percentage_change);
    println!();
    println!("   {}", comparison.insight);
    Ok(())
}

pub fn cmd_report_top(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    limit: usize,
    json: bool,
) -> Result<()> {
    let expenses = db.top_expenses(owner, filter, limit)?;
    if json {
        return print_json(&expenses);
    }
    if expenses.is_empty() {
        print_no_expenses();
        return Ok(());
    }

    println!("🏷️  Top {} Expenses", expenses.len());
    println!();
    for (i, e) in expenses.iter().enumerate() {
        println!(
            "   {:>2}. {:>12.2}  {:<10}  {:<16}  {}",
            i + 1,
            e.amount,
            e.date.format("%Y-%m-%d"),
            truncate(&e.category, 16),
            truncate(e.notes.as_deref().unwrap_or(""), 30)
        );
    }
    Ok(())
}
