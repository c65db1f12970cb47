//! Expense filter builder for constructing dynamic SQL queries
//!
//! Every bound is optional; an unset bound leaves that side of the query open.

use chrono::NaiveDate;

use super::DATE_FORMAT;

/// Builder for the WHERE clause shared by expense listings and reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    /// Inclusive, compared on the calendar date of the expense
    pub start_date: Option<NaiveDate>,
    /// Inclusive, compared on the calendar date of the expense
    pub end_date: Option<NaiveDate>,
    pub envelope_id: Option<i64>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact category match. Blank values are ignored.
    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        self
    }

    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    pub fn envelope_id(mut self, id: Option<i64>) -> Self {
        self.envelope_id = id;
        self
    }

    /// Build the WHERE clause for `owner_id`. Columns are referenced through
    /// the `e` alias.
    pub fn build(&self, owner_id: &str) -> FilterResult {
        let mut conditions = vec!["e.owner_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(owner_id.to_string())];

        if let Some(ref category) = self.category {
            conditions.push("e.category = ?".to_string());
            params.push(Box::new(category.clone()));
        }

        if let Some(start) = self.start_date {
            conditions.push("date(e.date) >= ?".to_string());
            params.push(Box::new(start.format(DATE_FORMAT).to_string()));
        }

        if let Some(end) = self.end_date {
            conditions.push("date(e.date) <= ?".to_string());
            params.push(Box::new(end.format(DATE_FORMAT).to_string()));
        }

        if let Some(envelope_id) = self.envelope_id {
            conditions.push("e.envelope_id = ?".to_string());
            params.push(Box::new(envelope_id));
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

/// Parse a user-supplied date bound. Missing or unparsable input means
/// "unbounded on that side" rather than an error.
pub fn parse_date_bound(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::warn!(value = raw, "Ignoring unparsable date bound");
            None
        }
    }
}
