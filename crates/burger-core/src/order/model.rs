//! Order domain model.

use serde::{Deserialize, Serialize};

use crate::recipe::Recipe;

/// The order currently being prepared, with all per-order progress.
///
/// Everything in here is discarded when the next order is dealt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub(crate) recipe: Recipe,
    /// Unlocked units; a component appears once per usable unit
    pub(crate) unlocked: Vec<String>,
    /// Player-built stack, bottom first
    pub(crate) assembly: Vec<String>,
    /// Score of the most recent judgment, passed or not
    pub(crate) last_quality_score: Option<u8>,
}

impl Order {
    /// Deals a fresh order for the recipe with no progress.
    pub fn new(recipe: Recipe) -> Self {
        Self {
            recipe,
            unlocked: Vec::new(),
            assembly: Vec::new(),
            last_quality_score: None,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn name(&self) -> &str {
        &self.recipe.name
    }

    pub fn unlocked(&self) -> &[String] {
        &self.unlocked
    }

    pub fn last_quality_score(&self) -> Option<u8> {
        self.last_quality_score
    }

    /// Number of unlocked units of `component`.
    pub fn unlocked_count(&self, component: &str) -> usize {
        self.unlocked.iter().filter(|c| *c == component).count()
    }
}
