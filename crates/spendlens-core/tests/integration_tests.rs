//! Integration tests for spendlens-core
//!
//! These tests exercise the full record → report → insight → preference workflow.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use spendlens_core::{
    analytics::{aggregate_by_category, aggregate_by_month},
    db::Database,
    models::{NewEnvelope, NewExpense, PaymentMode},
    AnalyticsConfig, Error, ExpenseFilter, InsightId, Severity,
};

const OWNER: &str = "owner-1";

fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(11, 0, 0)
        .unwrap()
}

/// The three-expense dataset used throughout these tests
fn seed_small(db: &Database) {
    for (category, amount, date) in [
        ("Food", 100.0, at(2024, 1, 5)),
        ("Food", 200.0, at(2024, 2, 5)),
        ("Transport", 50.0, at(2024, 2, 10)),
    ] {
        db.insert_expense(OWNER, &NewExpense::new(amount, category, date))
            .expect("Failed to insert expense");
    }
}

// =============================================================================
// Reports
// =============================================================================

#[test]
fn test_end_to_end_breakdowns_and_top_category() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    seed_small(&db);

    let categories = db
        .category_breakdown(OWNER, &ExpenseFilter::new())
        .unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category, "Food");
    assert_eq!(categories[0].total, 300.0);
    assert_eq!(categories[0].count, 2);
    assert_eq!(categories[1].category, "Transport");
    assert_eq!(categories[1].total, 50.0);
    assert_eq!(categories[1].count, 1);

    let months = db.monthly_summary(OWNER, &ExpenseFilter::new()).unwrap();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0].month, "2024-01");
    assert_eq!(months[0].total, 100.0);
    assert_eq!(months[0].count, 1);
    assert_eq!(months[1].month, "2024-02");
    assert_eq!(months[1].total, 250.0);
    assert_eq!(months[1].count, 2);

    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();
    let insights = db
        .generate_insights(OWNER, now, &AnalyticsConfig::default())
        .unwrap();
    let top = insights
        .iter()
        .find(|i| i.id == "top-category")
        .expect("top-category insight should be generated");
    assert!(top.description.contains("Food"));
    assert_eq!(top.metric_value, 300.0);
    assert_eq!(top.severity, Severity::Info);
}

#[test]
fn test_conservation_across_groupings() {
    let db = Database::in_memory().unwrap();
    let amounts = [12.34, 0.01, 999.99, 45.5, 1500.0, 3.33, 77.77];
    for (i, amount) in amounts.iter().enumerate() {
        let month = (i as u32 % 12) + 1;
        let category = ["Food", "Bills", "Travel"][i % 3];
        db.insert_expense(OWNER, &NewExpense::new(*amount, category, at(2023 + i as i32 % 2, month, 3)))
            .unwrap();
    }

    let expenses = db.list_expenses(OWNER, &ExpenseFilter::new()).unwrap();
    let raw: f64 = expenses.iter().map(|e| e.amount).sum();
    let by_category: f64 = aggregate_by_category(&expenses).iter().map(|c| c.total).sum();
    let by_month: f64 = aggregate_by_month(&expenses).iter().map(|m| m.total).sum();

    assert!((raw - by_category).abs() < 1e-9);
    assert!((raw - by_month).abs() < 1e-9);

    let dashboard = db.dashboard_summary(OWNER, &ExpenseFilter::new()).unwrap();
    assert_eq!(dashboard.expense_count, amounts.len());
    let breakdown_count: usize = dashboard.category_breakdown.values().map(|c| c.count).sum();
    assert_eq!(breakdown_count, amounts.len());
}

#[test]
fn test_statistics_and_patterns_from_store() {
    let db = Database::in_memory().unwrap();
    seed_small(&db);

    let stats = db
        .spending_statistics(OWNER, &ExpenseFilter::new())
        .unwrap()
        .unwrap();
    assert_eq!(stats.months, 2);
    assert_eq!(stats.mean, 175.0);
    assert_eq!(stats.median, 175.0);
    assert_eq!(stats.variance, 5625.0);
    assert_eq!(stats.std_dev, 75.0);
    assert_eq!(stats.distribution.medium, 1);
    assert_eq!(stats.distribution.very_high, 1);

    let patterns = db.spending_patterns(OWNER, &ExpenseFilter::new()).unwrap();
    assert_eq!(patterns[0].percent_change, 0.0);
    assert_eq!(patterns[0].direction, "down");
    assert_eq!(patterns[1].percent_change, 150.0);
    assert_eq!(patterns[1].direction, "up");
}

#[test]
fn test_payment_modes_and_weekdays() {
    let db = Database::in_memory().unwrap();
    db.insert_expense(
        OWNER,
        &NewExpense::new(80.0, "Food", at(2024, 1, 6)).with_payment_mode(PaymentMode::Upi),
    )
    .unwrap();
    db.insert_expense(OWNER, &NewExpense::new(20.0, "Food", at(2024, 1, 7)))
        .unwrap();

    let modes = db
        .payment_mode_breakdown(OWNER, &ExpenseFilter::new())
        .unwrap();
    assert_eq!(modes[0].payment_mode, "UPI");
    assert_eq!(modes[1].payment_mode, "Unspecified");

    // 2024-01-07 is a Sunday, 2024-01-06 a Saturday
    let days = db.weekday_breakdown(OWNER, &ExpenseFilter::new()).unwrap();
    assert_eq!(days[0].weekday, "Sunday");
    assert_eq!(days[1].weekday, "Saturday");
}

// =============================================================================
// Envelopes
// =============================================================================

#[test]
fn test_envelope_budget_flow() {
    let db = Database::in_memory().unwrap();
    let envelope = db
        .insert_envelope(
            OWNER,
            &NewEnvelope {
                name: "Conference".to_string(),
                budget: 1000.0,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
                description: None,
            },
        )
        .unwrap();

    let hotel = db
        .insert_expense(
            OWNER,
            &NewExpense::new(1000.0, "Travel", at(2024, 6, 1)).with_envelope(envelope),
        )
        .unwrap();

    let detail = db.envelope_detail(OWNER, envelope).unwrap();
    assert!(!detail.analytics.is_over_budget);
    assert_eq!(detail.analytics.percentage, "100.00");

    let taxi = db
        .insert_expense(OWNER, &NewExpense::new(0.01, "Travel", at(2024, 6, 2)))
        .unwrap();
    db.assign_expense_envelope(OWNER, taxi, Some(envelope)).unwrap();

    let detail = db.envelope_detail(OWNER, envelope).unwrap();
    assert!(detail.analytics.is_over_budget);
    assert_eq!(detail.analytics.remaining, -0.01);
    assert_eq!(detail.expenses.len(), 2);

    assert_eq!(db.delete_envelope(OWNER, envelope).unwrap(), 2);
    assert_eq!(db.get_expense(OWNER, hotel).unwrap().unwrap().envelope_id, None);
    assert!(matches!(
        db.envelope_detail(OWNER, envelope),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn test_zero_budget_envelope() {
    let db = Database::in_memory().unwrap();
    let envelope = db
        .insert_envelope(
            OWNER,
            &NewEnvelope {
                name: "No budget".to_string(),
                budget: 0.0,
                start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                description: None,
            },
        )
        .unwrap();
    db.insert_expense(
        OWNER,
        &NewExpense::new(5.0, "Food", at(2024, 6, 1)).with_envelope(envelope),
    )
    .unwrap();

    let detail = db.envelope_detail(OWNER, envelope).unwrap();
    assert!(detail.analytics.is_over_budget);
    assert_eq!(detail.analytics.percentage, "0.00");
}

// =============================================================================
// Insight preferences
// =============================================================================

#[test]
fn test_preference_workflow() {
    let db = Database::in_memory().unwrap();
    seed_small(&db);
    let config = AnalyticsConfig::default();
    let now = Utc.with_ymd_and_hms(2024, 2, 20, 9, 0, 0).unwrap();

    // The read path creates the record that dismiss relies on
    let first = db.generate_insights(OWNER, now, &config).unwrap();
    assert!(!first.is_empty());

    let diversity = InsightId::parse("diversity").unwrap();
    db.dismiss_insight(OWNER, &diversity).unwrap();
    db.dismiss_insight(OWNER, &diversity).unwrap();

    let pref = db.get_insight_preference(OWNER).unwrap().unwrap();
    assert_eq!(pref.dismissed_insight_ids.len(), 1);

    let second = db.generate_insights(OWNER, now, &config).unwrap();
    assert_eq!(second.len(), first.len() - 1);
    assert!(second.iter().all(|i| i.id != "diversity"));

    // Save moves it back out of dismissed
    db.save_insight(OWNER, &diversity).unwrap();
    let saved = db.saved_insights(OWNER, now, &config).unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "diversity");

    let pref = db.get_insight_preference(OWNER).unwrap().unwrap();
    assert!(pref.dismissed_insight_ids.is_empty());
}

#[test]
fn test_restore_scenario() {
    let db = Database::in_memory().unwrap();
    db.get_or_create_insight_preference(OWNER).unwrap();

    db.dismiss_insight(OWNER, &InsightId::parse("A").unwrap()).unwrap();
    db.dismiss_insight(OWNER, &InsightId::parse("B").unwrap()).unwrap();
    db.save_insight(OWNER, &InsightId::parse("C").unwrap()).unwrap();
    let pref = db.restore_dismissed_insights(OWNER).unwrap();

    assert!(pref.dismissed_insight_ids.is_empty());
    assert!(pref.is_saved("C"));
}

#[test]
fn test_missing_insight_id_is_validation_error() {
    assert!(matches!(InsightId::parse(""), Err(Error::Validation(_))));
    assert!(matches!(InsightId::require(None), Err(Error::Validation(_))));
}

#[test]
fn test_export_to_file() {
    let db = Database::in_memory().unwrap();
    seed_small(&db);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("expenses.csv");
    let csv = db.export_expenses_csv(OWNER, &ExpenseFilter::new()).unwrap();
    std::fs::write(&path, &csv).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 4);
    assert!(content.lines().nth(1).unwrap().starts_with("2024-02-10 11:00:00,Transport,50.00"));
}
