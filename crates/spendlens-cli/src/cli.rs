//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use spendlens_core::db::{parse_date_bound, ExpenseFilter};

/// Spendlens - Understand where your money goes
#[derive(Parser)]
#[command(name = "spendlens")]
#[command(about = "Expense tracking with spending analytics and insights", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "spendlens.db", global = true)]
    pub db: PathBuf,

    /// Owner whose data to operate on
    #[arg(long, env = "SPENDLENS_OWNER", default_value = "default", global = true)]
    pub owner: String,

    /// Analytics config file (defaults to the data directory override, if any)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SPENDLENS_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Record and manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Manage budget envelopes
    Envelopes {
        #[command(subcommand)]
        action: Option<EnvelopesAction>,
    },

    /// Generate spending reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Show, save and dismiss spending insights
    Insights {
        #[command(subcommand)]
        action: Option<InsightsAction>,
    },

    /// Export expenses to CSV
    Export {
        /// Output file (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

/// Filters shared by listings, reports and export.
///
/// Dates are YYYY-MM-DD and inclusive. An unparsable date is ignored.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only this category (exact match)
    #[arg(long)]
    pub category: Option<String>,

    /// Earliest date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Latest date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Only expenses linked to this envelope
    #[arg(long)]
    pub envelope: Option<i64>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> ExpenseFilter {
        ExpenseFilter::new()
            .category(self.category.as_deref())
            .start_date(parse_date_bound(self.from.as_deref()))
            .end_date(parse_date_bound(self.to.as_deref()))
            .envelope_id(self.envelope)
    }
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses, newest first
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Maximum number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Record an expense
    Add {
        /// Amount spent
        amount: f64,

        /// Category (e.g. Food, Transportation, Bills)
        category: String,

        /// Date as YYYY-MM-DD or "YYYY-MM-DD HH:MM" (defaults to now)
        #[arg(short, long)]
        date: Option<String>,

        /// Payment mode: cash, credit_card, debit_card, upi, net_banking, other
        #[arg(short, long)]
        payment_mode: Option<String>,

        /// Free-form notes (max 500 characters)
        #[arg(short, long)]
        notes: Option<String>,

        /// Envelope to charge this expense to
        #[arg(short, long)]
        envelope: Option<i64>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },

    /// Link an expense to an envelope (omit --envelope to unlink)
    Assign {
        /// Expense ID
        id: i64,

        /// Envelope ID
        #[arg(short, long)]
        envelope: Option<i64>,
    },
}

#[derive(Subcommand)]
pub enum EnvelopesAction {
    /// List envelopes with budget progress
    List,

    /// Create an envelope
    Add {
        /// Envelope name (e.g. "Goa trip")
        name: String,

        /// Budget amount
        #[arg(short, long)]
        budget: f64,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: String,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: String,

        /// Description
        #[arg(long)]
        description: Option<String>,
    },

    /// Show an envelope with its expenses and budget progress
    Show {
        /// Envelope ID
        id: i64,
    },

    /// Delete an envelope (its expenses are kept and unlinked)
    Delete {
        /// Envelope ID
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Spending by category
    Categories {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending by month
    Monthly {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Totals, average and per-category counts
    Dashboard {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending by payment mode
    PaymentModes {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending by year
    Yearly {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Spending by day of the week
    Weekdays {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Each category's share of total spending
    Shares {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Statistics over monthly totals
    Stats {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Month-over-month trends
    Trends {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// This month compared with last month
    Compare,

    /// Largest expenses
    Top {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of expenses to show
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },
}

#[derive(Subcommand)]
pub enum InsightsAction {
    /// Show current insights (dismissed ones are hidden)
    List,

    /// Show saved insights
    Saved,

    /// Save an insight
    Save {
        /// Insight ID (e.g. top-category)
        id: String,
    },

    /// Remove an insight from saved
    Unsave {
        /// Insight ID
        id: String,
    },

    /// Hide an insight
    Dismiss {
        /// Insight ID
        id: String,
    },

    /// Show all dismissed insights again
    Restore,

    /// Show saved and dismissed insight IDs
    Preferences,
}
