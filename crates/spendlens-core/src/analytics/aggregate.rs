//! Grouping of expenses into category and time buckets

use std::collections::HashMap;
use std::hash::Hash;

use chrono::{Datelike, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::Expense;

/// Total and count for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAggregate {
    pub category: String,
    pub total: f64,
    pub count: usize,
}

impl CategoryAggregate {
    /// Mean amount per expense in this category
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total / self.count as f64
        }
    }
}

/// Total and count for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAggregate {
    /// Zero-padded "YYYY-MM"
    pub month: String,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAggregate {
    pub year: i32,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayAggregate {
    pub weekday: Weekday,
    pub total: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentModeAggregate {
    /// Payment mode label, or "Unspecified"
    pub payment_mode: String,
    pub total: f64,
    pub count: usize,
}

/// Category and month aggregates computed from the same expense set
#[derive(Debug, Clone, Default)]
pub struct Aggregates {
    pub categories: Vec<CategoryAggregate>,
    pub months: Vec<MonthAggregate>,
}

impl Aggregates {
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        Self {
            categories: aggregate_by_category(expenses),
            months: aggregate_by_month(expenses),
        }
    }

    /// Sum over all categories (equals the sum over all months)
    pub fn total(&self) -> f64 {
        self.categories.iter().map(|c| c.total).sum()
    }

    pub fn expense_count(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }
}

/// Month bucket key for a timestamp, e.g. "2024-02"
pub fn month_key(date: &NaiveDateTime) -> String {
    date.format("%Y-%m").to_string()
}

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Group expenses by key, keeping buckets in first-seen order
fn group_by<K, F>(expenses: &[Expense], key_fn: F) -> Vec<(K, f64, usize)>
where
    K: Eq + Hash + Clone,
    F: Fn(&Expense) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut buckets: Vec<(K, f64, usize)> = Vec::new();

    for expense in expenses {
        let key = key_fn(expense);
        match index.get(&key) {
            Some(&i) => {
                buckets[i].1 += expense.amount;
                buckets[i].2 += 1;
            }
            None => {
                index.insert(key.clone(), buckets.len());
                buckets.push((key, expense.amount, 1));
            }
        }
    }

    buckets
}

/// Category totals, largest first. Ties keep first-seen category order.
pub fn aggregate_by_category(expenses: &[Expense]) -> Vec<CategoryAggregate> {
    let mut categories: Vec<CategoryAggregate> = group_by(expenses, |e| e.category.clone())
        .into_iter()
        .map(|(category, total, count)| CategoryAggregate {
            category,
            total,
            count,
        })
        .collect();

    // sort_by is stable, so equal totals stay in first-seen order
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));
    categories
}

/// Month totals in chronological order
pub fn aggregate_by_month(expenses: &[Expense]) -> Vec<MonthAggregate> {
    let mut months: Vec<MonthAggregate> = group_by(expenses, |e| month_key(&e.date))
        .into_iter()
        .map(|(month, total, count)| MonthAggregate {
            month,
            total,
            count,
        })
        .collect();

    months.sort_by(|a, b| a.month.cmp(&b.month));
    months
}

/// Year totals, most recent year first
pub fn aggregate_by_year(expenses: &[Expense]) -> Vec<YearAggregate> {
    let mut years: Vec<YearAggregate> = group_by(expenses, |e| e.date.year())
        .into_iter()
        .map(|(year, total, count)| YearAggregate { year, total, count })
        .collect();

    years.sort_by(|a, b| b.year.cmp(&a.year));
    years
}

/// Weekday totals, Sunday first. Weekdays without expenses are omitted.
pub fn aggregate_by_weekday(expenses: &[Expense]) -> Vec<WeekdayAggregate> {
    let mut days: Vec<WeekdayAggregate> = group_by(expenses, |e| e.date.weekday())
        .into_iter()
        .map(|(weekday, total, count)| WeekdayAggregate {
            weekday,
            total,
            count,
        })
        .collect();

    days.sort_by_key(|d| d.weekday.num_days_from_sunday());
    days
}

/// Payment mode totals, largest first
pub fn aggregate_by_payment_mode(expenses: &[Expense]) -> Vec<PaymentModeAggregate> {
    let mut modes: Vec<PaymentModeAggregate> = group_by(expenses, |e| {
        e.payment_mode
            .map(|m| m.label().to_string())
            .unwrap_or_else(|| "Unspecified".to_string())
    })
    .into_iter()
    .map(|(payment_mode, total, count)| PaymentModeAggregate {
        payment_mode,
        total,
        count,
    })
    .collect();

    modes.sort_by(|a, b| b.total.total_cmp(&a.total));
    modes
}
