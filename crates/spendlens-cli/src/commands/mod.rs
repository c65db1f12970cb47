//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, load_config, print_json)
//! - `envelopes` - Budget envelope commands
//! - `expenses` - Expense commands (list, add, delete, assign)
//! - `export` - CSV export
//! - `insights` - Insight listing and save/dismiss preferences
//! - `reports` - Report generation commands

pub mod core;
pub mod envelopes;
pub mod expenses;
pub mod export;
pub mod insights;
pub mod reports;

// Re-export command functions for main.rs
pub use self::core::*;
pub use envelopes::*;
pub use expenses::*;
pub use export::*;
pub use insights::*;
pub use reports::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
