//! Recipe domain model.

use serde::{Deserialize, Serialize};

/// The wrapper component every recipe starts and ends with.
pub const BOUNDARY_MARKER: &str = "bun";

/// A named order made of an ordered list of required components.
///
/// Components may repeat (a double cheeseburger needs `cheese` twice).
/// Recipes are only built through [`RecipeCatalog`](super::RecipeCatalog), which checks
/// that the first and last components are the boundary marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Display name of the order
    pub name: String,
    /// Required components, boundary marker included on both ends
    pub components: Vec<String>,
}

impl Recipe {
    pub fn new(name: impl Into<String>, components: Vec<String>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    /// Components between the two boundary markers.
    pub fn interior(&self) -> &[String] {
        if self.components.len() < 2 {
            return &[];
        }
        &self.components[1..self.components.len() - 1]
    }

    /// Number of times `component` appears in the recipe.
    pub fn required_count(&self, component: &str) -> usize {
        self.components.iter().filter(|c| *c == component).count()
    }

    /// Distinct components in first-occurrence order.
    pub fn distinct_components(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for component in &self.components {
            if !seen.contains(&component.as_str()) {
                seen.push(component);
            }
        }
        seen
    }

    pub fn requires(&self, component: &str) -> bool {
        self.components.iter().any(|c| c == component)
    }
}
