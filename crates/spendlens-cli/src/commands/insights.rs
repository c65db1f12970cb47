//! Insight command implementations

use anyhow::Result;
use chrono::{DateTime, Utc};
use spendlens_core::db::Database;
use spendlens_core::{AnalyticsConfig, Insight, InsightId, InsightPreference, Severity};

use super::print_json;

fn print_insights(insights: &[Insight], pref: Option<&InsightPreference>) {
    for insight in insights {
        let marker = match insight.severity {
            Severity::Warning => "⚠️ ",
            Severity::Alert => "🚨",
            Severity::Info => "  ",
        };
        let saved = if pref.is_some_and(|p| p.is_saved(&insight.id)) {
            " ★"
        } else {
            ""
        };
        println!("{} {} {}{}", marker, insight.icon, insight.title, saved);
        println!("      {}", insight.description);
        println!("      id: {}", insight.id);
        println!();
    }
}

fn print_ids(label: &str, ids: Vec<&str>) {
    if ids.is_empty() {
        println!("   {:<11} (none)", label);
    } else {
        println!("   {:<11} {}", label, ids.join(", "));
    }
}

pub fn cmd_insights_list(
    db: &Database,
    owner: &str,
    config: &AnalyticsConfig,
    json: bool,
) -> Result<()> {
    cmd_insights_list_at(db, owner, config, Utc::now(), json)
}

/// List insights as of `now`
pub fn cmd_insights_list_at(
    db: &Database,
    owner: &str,
    config: &AnalyticsConfig,
    now: DateTime<Utc>,
    json: bool,
) -> Result<()> {
    let insights = db.generate_insights(owner, now, config)?;
    if json {
        return print_json(&insights);
    }

    if insights.is_empty() {
        println!("No insights yet. Record a few expenses first.");
        return Ok(());
    }

    let pref = db.get_insight_preference(owner)?;

    println!("💡 Spending Insights");
    println!();
    print_insights(&insights, pref.as_ref());

    if let Some(pref) = &pref {
        if !pref.dismissed_insight_ids.is_empty() {
            println!(
                "   {} dismissed insight(s) hidden. Show them again with: spendlens insights restore",
                pref.dismissed_insight_ids.len()
            );
        }
    }
    Ok(())
}

pub fn cmd_insights_saved(
    db: &Database,
    owner: &str,
    config: &AnalyticsConfig,
    json: bool,
) -> Result<()> {
    let insights = db.saved_insights(owner, Utc::now(), config)?;
    if json {
        return print_json(&insights);
    }

    if insights.is_empty() {
        println!("No saved insights. Save one with: spendlens insights save <id>");
        return Ok(());
    }

    println!("★ Saved Insights");
    println!();
    print_insights(&insights, None);
    Ok(())
}

pub fn cmd_insights_save(db: &Database, owner: &str, id: &str) -> Result<()> {
    let id = InsightId::parse(id)?;
    db.save_insight(owner, &id)?;
    println!("✓ Saved insight '{}'", id);
    Ok(())
}

pub fn cmd_insights_unsave(db: &Database, owner: &str, id: &str) -> Result<()> {
    let id = InsightId::parse(id)?;
    db.unsave_insight(owner, &id)?;
    println!("✓ Removed '{}' from saved insights", id);
    Ok(())
}

pub fn cmd_insights_dismiss(db: &Database, owner: &str, id: &str) -> Result<()> {
    let id = InsightId::parse(id)?;
    db.dismiss_insight(owner, &id)?;
    println!("✓ Dismissed insight '{}'", id);
    Ok(())
}

pub fn cmd_insights_restore(db: &Database, owner: &str) -> Result<()> {
    let before = db
        .get_insight_preference(owner)?
        .map(|p| p.dismissed_insight_ids.len())
        .unwrap_or(0);
    db.restore_dismissed_insights(owner)?;
    println!("✓ Restored {} dismissed insight(s)", before);
    Ok(())
}

pub fn cmd_insights_preferences(db: &Database, owner: &str, json: bool) -> Result<()> {
    let pref = db.get_or_create_insight_preference(owner)?;
    if json {
        return print_json(&pref);
    }

    println!("⚙️  Insight Preferences ({})", pref.owner_id);
    println!();
    print_ids("Saved:", pref.saved_insight_ids.iter().collect());
    print_ids("Dismissed:", pref.dismissed_insight_ids.iter().collect());
    match pref.last_generated_at {
        Some(at) => println!("   {:<11} {}", "Generated:", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => println!("   {:<11} never", "Generated:"),
    }
    Ok(())
}
