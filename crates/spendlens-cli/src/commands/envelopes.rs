//! Budget envelope command implementations

use anyhow::{Context, Result};
use chrono::NaiveDate;
use spendlens_core::db::Database;
use spendlens_core::models::{EnvelopeAnalytics, NewEnvelope};

use super::{print_json, truncate};

fn parse_envelope_date(raw: &str, flag: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid {} date '{}' (use YYYY-MM-DD)", flag, raw))
}

fn progress_bar(analytics: &EnvelopeAnalytics) -> String {
    const WIDTH: usize = 20;
    let ratio = if analytics.budget > 0.0 {
        (analytics.total_spent / analytics.budget).clamp(0.0, 1.0)
    } else if analytics.total_spent > 0.0 {
        1.0
    } else {
        0.0
    };
    let filled = (ratio * WIDTH as f64).round() as usize;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(WIDTH - filled))
}

pub fn cmd_envelopes_list(db: &Database, owner: &str, json: bool) -> Result<()> {
    let envelopes = db.list_envelopes(owner)?;
    let details = envelopes
        .iter()
        .map(|e| db.envelope_detail(owner, e.id))
        .collect::<spendlens_core::Result<Vec<_>>>()?;

    if json {
        return print_json(&details);
    }

    if details.is_empty() {
        println!("No envelopes yet. Create one with: spendlens envelopes add <name> --budget <amount> --start <date> --end <date>");
        return Ok(());
    }

    println!("📁 Envelopes");
    println!();
    for d in &details {
        let status = if d.analytics.is_over_budget { "⚠️ " } else { "  " };
        println!(
            "{}#{:<4} {:<24} {} → {}",
            status,
            d.envelope.id,
            truncate(&d.envelope.name, 24),
            d.envelope.start_date,
            d.envelope.end_date
        );
        println!(
            "         {} {:>10.2} / {:<10.2} ({}%)",
            progress_bar(&d.analytics),
            d.analytics.total_spent,
            d.analytics.budget,
            d.analytics.percentage
        );
    }

    Ok(())
}

pub fn cmd_envelopes_add(
    db: &Database,
    owner: &str,
    name: &str,
    budget: f64,
    start: &str,
    end: &str,
    description: Option<String>,
) -> Result<()> {
    let envelope = NewEnvelope {
        name: name.to_string(),
        budget,
        start_date: parse_envelope_date(start, "--start")?,
        end_date: parse_envelope_date(end, "--end")?,
        description,
    };

    let id = db
        .insert_envelope(owner, &envelope)
        .context("Failed to create envelope")?;

    println!(
        "✓ Created envelope #{} '{}' with budget {:.2} ({} → {})",
        id, envelope.name, envelope.budget, envelope.start_date, envelope.end_date
    );
    Ok(())
}

pub fn cmd_envelopes_show(db: &Database, owner: &str, id: i64, json: bool) -> Result<()> {
    let detail = db.envelope_detail(owner, id)?;

    if json {
        return print_json(&detail);
    }

    let envelope = &detail.envelope;
    let analytics = &detail.analytics;

    println!("📁 {} (#{})", envelope.name, envelope.id);
    if let Some(description) = &envelope.description {
        println!("   {}", description);
    }
    println!("   {} → {}", envelope.start_date, envelope.end_date);
    println!();
    println!("   Budget:     {:>12.2}", analytics.budget);
    println!("   Spent:      {:>12.2}", analytics.total_spent);
    println!("   Remaining:  {:>12.2}", analytics.remaining);
    println!("   Used:       {:>11}%  {}", analytics.percentage, progress_bar(analytics));
    if analytics.is_over_budget {
        println!("   ⚠️  Over budget");
    }

    println!();
    if detail.expenses.is_empty() {
        println!("   No expenses linked to this envelope.");
        return Ok(());
    }

    println!("   {:<16}  {:<16}  {:>10}  Notes", "Date", "Category", "Amount");
    println!("   {}", "─".repeat(60));
    for e in &detail.expenses {
        println!(
            "   {:<16}  {:<16}  {:>10.2}  {}",
            e.date.format("%Y-%m-%d %H:%M"),
            truncate(&e.category, 16),
            e.amount,
            truncate(e.notes.as_deref().unwrap_or(""), 24)
        );
    }

    Ok(())
}

pub fn cmd_envelopes_delete(db: &Database, owner: &str, id: i64) -> Result<()> {
    let envelope = db
        .get_envelope(owner, id)?
        .with_context(|| format!("Envelope {} not found", id))?;
    let unlinked = db.delete_envelope(owner, id)?;

    println!("✓ Deleted envelope #{} '{}'", id, envelope.name);
    if unlinked > 0 {
        println!("   {} expense(s) kept and unlinked", unlinked);
    }
    Ok(())
}
