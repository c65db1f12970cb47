//! Envelope budget progress

use serde::{Deserialize, Serialize};

use crate::models::{Envelope, Expense};

/// Spend-vs-budget for one envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub total_spent: f64,
    pub budget: f64,
    /// `budget - total_spent`; negative once over budget
    pub remaining: f64,
    /// Percent of budget used; 0 when the budget is 0
    pub percentage: f64,
    /// `total_spent > budget`, independent of the percentage guard
    pub is_over_budget: bool,
}

impl BudgetProgress {
    pub fn compute(budget: f64, total_spent: f64) -> Self {
        let percentage = if budget > 0.0 {
            total_spent / budget * 100.0
        } else {
            0.0
        };

        Self {
            total_spent,
            budget,
            remaining: budget - total_spent,
            percentage,
            is_over_budget: total_spent > budget,
        }
    }

    /// Progress for `envelope`, counting only expenses that reference it
    pub fn for_envelope(envelope: &Envelope, expenses: &[Expense]) -> Self {
        let total_spent = expenses
            .iter()
            .filter(|e| e.envelope_id == Some(envelope.id))
            .map(|e| e.amount)
            .sum();
        Self::compute(envelope.budget, total_spent)
    }
}
