//! Spending analytics
//!
//! Pure, synchronous computations over a snapshot of expenses. Nothing in this
//! module touches the database or rounds values; rounding is applied by the
//! report layer when results are handed to a caller.
//!
//! - `aggregate` - category, month, year, weekday and payment-mode buckets
//! - `stats` - descriptive statistics over a numeric series
//! - `trend` - period-over-period change and rolling window comparisons
//! - `budget` - envelope spend-vs-budget progress

pub mod aggregate;
pub mod budget;
pub mod stats;
pub mod trend;

pub use aggregate::{
    aggregate_by_category, aggregate_by_month, aggregate_by_payment_mode, aggregate_by_weekday,
    aggregate_by_year, month_key, weekday_name, Aggregates, CategoryAggregate, MonthAggregate,
    PaymentModeAggregate, WeekdayAggregate, YearAggregate,
};
pub use budget::BudgetProgress;
pub use stats::{DistributionBucket, SeriesStatistics};
pub use trend::{
    compare_calendar_months, compare_windows, percent_change, AverageComparison, Direction,
    PeriodTrend, TrendReport, WindowComparison,
};
