//! Expense command implementations

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use spendlens_core::db::Database;
use spendlens_core::models::{NewExpense, PaymentMode};

use super::{print_json, truncate};
use crate::cli::FilterArgs;

/// Parse `--date` as a full timestamp, a timestamp without seconds, or a bare date
pub fn parse_expense_date(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' (use YYYY-MM-DD or \"YYYY-MM-DD HH:MM\")", raw))?;
    Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default())
}

pub fn cmd_expenses_list(
    db: &Database,
    owner: &str,
    filter: &FilterArgs,
    limit: usize,
    json: bool,
) -> Result<()> {
    let expenses = db.list_expenses(owner, &filter.to_filter())?;
    let total = expenses.len();
    let shown: Vec<_> = expenses.into_iter().take(limit).collect();

    if json {
        return print_json(&shown);
    }

    if shown.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }

    println!(
        "{:>6}  {:<16}  {:<16}  {:>10}  {:<12}  Notes",
        "ID", "Date", "Category", "Amount", "Payment"
    );
    println!("{}", "─".repeat(80));
    for e in &shown {
        let mode = e.payment_mode.map(|m| m.label()).unwrap_or("-");
        let envelope = e
            .envelope_id
            .map(|id| format!(" [envelope {}]", id))
            .unwrap_or_default();
        println!(
            "{:>6}  {:<16}  {:<16}  {:>10.2}  {:<12}  {}{}",
            e.id,
            e.date.format("%Y-%m-%d %H:%M"),
            truncate(&e.category, 16),
            e.amount,
            mode,
            truncate(e.notes.as_deref().unwrap_or(""), 30),
            envelope
        );
    }

    if total > shown.len() {
        println!();
        println!("   Showing {} of {} expenses (use --limit to see more)", shown.len(), total);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_expenses_add(
    db: &Database,
    owner: &str,
    amount: f64,
    category: &str,
    date: Option<&str>,
    payment_mode: Option<&str>,
    notes: Option<String>,
    envelope: Option<i64>,
) -> Result<()> {
    let date = match date {
        Some(raw) => parse_expense_date(raw)?,
        None => {
            let now = Local::now().naive_local();
            now.with_nanosecond(0).unwrap_or(now)
        }
    };

    let mut expense = NewExpense::new(amount, category, date);
    if let Some(raw) = payment_mode {
        let mode: PaymentMode = match raw.parse() {
            Ok(mode) => mode,
            Err(e) => bail!("{}", e),
        };
        expense = expense.with_payment_mode(mode);
    }
    if let Some(notes) = notes {
        expense = expense.with_notes(notes);
    }
    if let Some(envelope_id) = envelope {
        expense = expense.with_envelope(envelope_id);
    }

    let id = db
        .insert_expense(owner, &expense)
        .context("Failed to record expense")?;

    println!(
        "✓ Recorded expense #{}: {:.2} on {} ({})",
        id,
        amount,
        expense.category,
        date.format("%Y-%m-%d")
    );
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    db.delete_expense(owner, id)?;
    println!("✓ Deleted expense #{}", id);
    Ok(())
}

pub fn cmd_expenses_assign(
    db: &Database,
    owner: &str,
    id: i64,
    envelope: Option<i64>,
) -> Result<()> {
    db.assign_expense_envelope(owner, id, envelope)?;
    match envelope {
        Some(envelope_id) => println!("✓ Expense #{} linked to envelope #{}", id, envelope_id),
        None => println!("✓ Expense #{} unlinked from its envelope", id),
    }
    Ok(())
}
