//! Spending reports over stored expenses
//!
//! Each report loads one snapshot of the owner's expenses and hands it to the
//! builders in `crate::reports`.

use chrono::NaiveDate;

use super::expense_filter::ExpenseFilter;
use super::Database;
use crate::error::{Error, Result};
use crate::models::*;
use crate::reports;

impl Database {
    pub fn category_breakdown(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<CategoryBreakdownRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::category_breakdown(&expenses))
    }

    pub fn monthly_summary(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<MonthlySummaryRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::monthly_summary(&expenses))
    }

    pub fn yearly_summary(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<YearlySummaryRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::yearly_summary(&expenses))
    }

    pub fn payment_mode_breakdown(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<PaymentModeRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::payment_mode_breakdown(&expenses))
    }

    pub fn weekday_breakdown(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<Vec<WeekdayRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::weekday_breakdown(&expenses))
    }

    pub fn category_shares(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<CategoryShare>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::category_shares(&expenses))
    }

    pub fn dashboard_summary(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<DashboardSummary> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::dashboard_summary(&expenses))
    }

    pub fn spending_summary(&self, owner_id: &str, filter: &ExpenseFilter) -> Result<SpendingSummary> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::spending_summary(&expenses))
    }

    /// Envelope with its expenses and budget progress.
    ///
    /// A missing envelope is an error, not an empty detail.
    pub fn envelope_detail(&self, owner_id: &str, envelope_id: i64) -> Result<EnvelopeDetail> {
        let envelope = self
            .get_envelope(owner_id, envelope_id)?
            .ok_or_else(|| Error::NotFound(format!("Envelope {} not found", envelope_id)))?;

        let expenses =
            self.list_expenses(owner_id, &ExpenseFilter::new().envelope_id(Some(envelope_id)))?;

        Ok(reports::envelope_detail(envelope, expenses))
    }

    /// This calendar month (containing `today`) against the previous one
    pub fn period_comparison(&self, owner_id: &str, today: NaiveDate) -> Result<PeriodComparison> {
        let expenses = self.list_expenses(owner_id, &ExpenseFilter::new())?;
        Ok(reports::period_comparison(&expenses, today))
    }

    pub fn spending_statistics(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Option<SpendingStatisticsReport>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::spending_statistics(&expenses))
    }

    pub fn spending_patterns(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
    ) -> Result<Vec<SpendingPatternRow>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::spending_patterns(&expenses))
    }

    pub fn top_expenses(
        &self,
        owner_id: &str,
        filter: &ExpenseFilter,
        limit: usize,
    ) -> Result<Vec<Expense>> {
        let expenses = self.list_expenses(owner_id, filter)?;
        Ok(reports::top_expenses(&expenses, limit))
    }
}
