//! Spendlens CLI - Expense analytics and insights
//!
//! Usage:
//!   spendlens init                          Initialize database
//!   spendlens expenses add 250 Food         Record an expense
//!   spendlens report categories             Spending by category
//!   spendlens insights                      Show spending insights

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let owner = cli.owner.as_str();
    let json = cli.json;

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None => commands::cmd_expenses_list(&db, owner, &FilterArgs::default(), 20, json),
                Some(ExpensesAction::List { filter, limit }) => {
                    commands::cmd_expenses_list(&db, owner, &filter, limit, json)
                }
                Some(ExpensesAction::Add {
                    amount,
                    category,
                    date,
                    payment_mode,
                    notes,
                    envelope,
                }) => commands::cmd_expenses_add(
                    &db,
                    owner,
                    amount,
                    &category,
                    date.as_deref(),
                    payment_mode.as_deref(),
                    notes,
                    envelope,
                ),
                Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&db, owner, id),
                Some(ExpensesAction::Assign { id, envelope }) => {
                    commands::cmd_expenses_assign(&db, owner, id, envelope)
                }
            }
        }
        Commands::Envelopes { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(EnvelopesAction::List) => commands::cmd_envelopes_list(&db, owner, json),
                Some(EnvelopesAction::Add {
                    name,
                    budget,
                    start,
                    end,
                    description,
                }) => commands::cmd_envelopes_add(&db, owner, &name, budget, &start, &end, description),
                Some(EnvelopesAction::Show { id }) => {
                    commands::cmd_envelopes_show(&db, owner, id, json)
                }
                Some(EnvelopesAction::Delete { id }) => {
                    commands::cmd_envelopes_delete(&db, owner, id)
                }
            }
        }
        Commands::Report { report_type } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match report_type {
                ReportType::Categories { filter } => {
                    commands::cmd_report_categories(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Monthly { filter } => {
                    commands::cmd_report_monthly(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Dashboard { filter } => {
                    commands::cmd_report_dashboard(&db, owner, &filter.to_filter(), json)
                }
                ReportType::PaymentModes { filter } => {
                    commands::cmd_report_payment_modes(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Yearly { filter } => {
                    commands::cmd_report_yearly(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Weekdays { filter } => {
                    commands::cmd_report_weekdays(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Shares { filter } => {
                    commands::cmd_report_shares(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Stats { filter } => {
                    commands::cmd_report_stats(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Trends { filter } => {
                    commands::cmd_report_trends(&db, owner, &filter.to_filter(), json)
                }
                ReportType::Compare => commands::cmd_report_compare(&db, owner, json),
                ReportType::Top { filter, limit } => {
                    commands::cmd_report_top(&db, owner, &filter.to_filter(), limit, json)
                }
            }
        }
        Commands::Insights { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let config = commands::load_config(cli.config.as_deref())?;
            match action {
                None | Some(InsightsAction::List) => {
                    commands::cmd_insights_list(&db, owner, &config, json)
                }
                Some(InsightsAction::Saved) => commands::cmd_insights_saved(&db, owner, &config, json),
                Some(InsightsAction::Save { id }) => commands::cmd_insights_save(&db, owner, &id),
                Some(InsightsAction::Unsave { id }) => {
                    commands::cmd_insights_unsave(&db, owner, &id)
                }
                Some(InsightsAction::Dismiss { id }) => {
                    commands::cmd_insights_dismiss(&db, owner, &id)
                }
                Some(InsightsAction::Restore) => commands::cmd_insights_restore(&db, owner),
                Some(InsightsAction::Preferences) => {
                    commands::cmd_insights_preferences(&db, owner, json)
                }
            }
        }
        Commands::Export { output, filter } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_export(&db, owner, &filter.to_filter(), output.as_deref())
        }
    }
}
