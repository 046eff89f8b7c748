//! Unlock ledger: which components passed the quality gate for the current order.

use serde::{Deserialize, Serialize};

use super::Order;
use crate::oracle::QualityJudgment;

/// Result of presenting a judgment to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UnlockOutcome {
    /// The component was unlocked; `units` is how many usable units were added.
    Granted { units: usize },
    /// The score was below the threshold.
    Denied { score: u8, threshold: u8 },
}

impl UnlockOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }
}

/// Applies the unlock policy to orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockLedger {
    threshold: u8,
}

impl UnlockLedger {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Records the judgment on the order and unlocks the component when the score
    /// reaches the threshold.
    ///
    /// One passing drawing covers every unit the recipe requires: a component that
    /// appears N times in the recipe gets all of its missing units at once.
    pub fn attempt_unlock(
        &self,
        order: &mut Order,
        component: &str,
        judgment: &QualityJudgment,
    ) -> UnlockOutcome {
        order.last_quality_score = Some(judgment.score);

        if judgment.score < self.threshold {
            tracing::debug!(component, score = judgment.score, "Unlock denied");
            return UnlockOutcome::Denied {
                score: judgment.score,
                threshold: self.threshold,
            };
        }

        let missing = order
            .recipe
            .required_count(component)
            .saturating_sub(order.unlocked_count(component));
        order
            .unlocked
            .extend(std::iter::repeat_n(component.to_string(), missing));

        tracing::debug!(component, units = missing, "Unlock granted");
        UnlockOutcome::Granted { units: missing }
    }
}

/// Distinct components still short of their required count, in recipe order.
pub fn remaining_to_unlock(order: &Order) -> Vec<String> {
    order
        .recipe
        .distinct_components()
        .into_iter()
        .filter(|c| order.unlocked_count(c) < order.recipe.required_count(c))
        .map(str::to_string)
        .collect()
}
