//! Insight generation over stored expenses

use chrono::{DateTime, Utc};
use tracing::info;

use super::expense_filter::ExpenseFilter;
use super::Database;
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::insights::{filter_dismissed, Insight, InsightContext, InsightGenerator};

impl Database {
    /// Generate insights from all of the owner's expenses, minus dismissed ones.
    ///
    /// Creates the owner's preference record if needed and records `now` as
    /// the last generation time.
    pub fn generate_insights(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Result<Vec<Insight>> {
        let insights = self.generate_all_insights(owner_id, now, config)?;
        let pref = self.touch_insights_generated(owner_id, now)?;

        let generated = insights.len();
        let visible = filter_dismissed(insights, pref.dismissed_insight_ids.iter());
        info!(
            owner = owner_id,
            generated,
            dismissed = generated - visible.len(),
            "Insights generated"
        );
        Ok(visible)
    }

    /// Currently generated insights the owner has saved
    pub fn saved_insights(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Result<Vec<Insight>> {
        let pref = self.get_or_create_insight_preference(owner_id)?;
        let insights = self.generate_all_insights(owner_id, now, config)?;

        Ok(insights
            .into_iter()
            .filter(|i| pref.is_saved(&i.id) && !pref.is_dismissed(&i.id))
            .collect())
    }

    fn generate_all_insights(
        &self,
        owner_id: &str,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Result<Vec<Insight>> {
        let expenses = self.list_expenses(owner_id, &ExpenseFilter::new())?;
        let ctx = InsightContext::new(&expenses, now.naive_utc(), config);
        Ok(InsightGenerator::new().generate(&ctx))
    }
}
