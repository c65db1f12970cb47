//! CSV export of expenses

use std::io::Write;

use super::expense_filter::ExpenseFilter;
use super::{Database, DATETIME_FORMAT};
use crate::error::{Error, Result};
use crate::models::Expense;

const CSV_HEADER: [&str; 7] = [
    "date",
    "category",
    "amount",
    "payment_mode",
    "notes",
    "envelope_id",
    "id",
];

/// Write `expenses` as CSV with a header row
pub fn write_expenses_csv<W: Write>(writer: W, expenses: &[Expense]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADER)?;

    for expense in expenses {
        csv.write_record([
            expense.date.format(DATETIME_FORMAT).to_string(),
            expense.category.clone(),
            format!("{:.2}", expense.amount),
            expense
                .payment_mode
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            expense.notes.clone().unwrap_or_default(),
            expense
                .envelope_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            expense.id.to_string(),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

impl Database {
    /// Export the owner's expenses matching `filter` to a CSV string
    pub fn export_expenses_csv(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<String> {
        let expenses = self.list_expenses(owner_id, filter)?;

        let mut buffer = Vec::new();
        write_expenses_csv(&mut buffer, &expenses)?;

        String::from_utf8(buffer).map_err(|e| Error::InvalidData(format!("CSV output: {}", e)))
    }
}
