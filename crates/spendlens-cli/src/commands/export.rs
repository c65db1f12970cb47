//! Export command implementations

use std::path::Path;

use anyhow::{Context, Result};
use spendlens_core::db::{Database, ExpenseFilter};

pub fn cmd_export(
    db: &Database,
    owner: &str,
    filter: &ExpenseFilter,
    output: Option<&Path>,
) -> Result<()> {
    let csv = db.export_expenses_csv(owner, filter)?;
    let rows = csv.lines().count().saturating_sub(1);

    match output {
        Some(path) => {
            std::fs::write(path, &csv)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("✓ Exported {} expenses to {}", rows, path.display());
        }
        None => print!("{}", csv),
    }

    Ok(())
}
