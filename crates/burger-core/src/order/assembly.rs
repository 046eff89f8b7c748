//! Assembly stack: the sequence the player builds from unlocked components.

use super::Order;
use crate::error::{BurgerError, Result};

impl Order {
    /// Current stack, bottom first.
    pub fn assembly(&self) -> &[String] {
        &self.assembly
    }

    /// Unlocked units of `component` not yet placed on the stack.
    pub fn available_units(&self, component: &str) -> usize {
        let used = self.assembly.iter().filter(|c| *c == component).count();
        self.unlocked_count(component).saturating_sub(used)
    }

    /// Components with at least one unplaced unit, in unlock order.
    pub fn available_components(&self) -> Vec<&str> {
        let mut available: Vec<&str> = Vec::new();
        for component in &self.unlocked {
            if !available.contains(&component.as_str()) && self.available_units(component) > 0 {
                available.push(component);
            }
        }
        available
    }

    /// Places one unit of `component` on top of the stack.
    ///
    /// Fails without touching the stack when no unused unlocked unit is left.
    pub fn push_component(&mut self, component: &str) -> Result<()> {
        if self.available_units(component) == 0 {
            return Err(BurgerError::component_not_unlocked(component));
        }
        self.assembly.push(component.to_string());
        tracing::debug!(component, height = self.assembly.len(), "Component stacked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe::RecipeCatalog;

    fn order_with_unlocked(name: &str, unlocked: &[&str]) -> Order {
        let mut order = Order::new(RecipeCatalog::builtin().get(name).unwrap().clone());
        order.unlocked = unlocked.iter().map(|s| s.to_string()).collect();
        order
    }

    #[test]
    fn test_push_requires_unlocked_component() {
        let mut order = order_with_unlocked("cheeseburger", &["patty"]);
        let err = order.push_component("cheese").unwrap_err();
        assert_eq!(err, BurgerError::component_not_unlocked("cheese"));
        assert!(order.assembly().is_empty());
    }

    #[test]
    fn test_push_consumes_units() {
        let mut order = order_with_unlocked("cheeseburger", &["bun", "bun", "patty"]);

        order.push_component("bun").unwrap();
        order.push_component("patty").unwrap();
        order.push_component("bun").unwrap();

        assert_eq!(order.assembly(), ["bun", "patty", "bun"]);
        assert!(order.push_component("bun").is_err());
        assert!(order.push_component("patty").is_err());
        assert_eq!(order.assembly().len(), 3);
    }

    #[test]
    fn test_available_components() {
        let mut order = order_with_unlocked("double cheeseburger", &["cheese", "cheese", "bun", "bun"]);
        order.push_component("cheese").unwrap();
        assert_eq!(order.available_components(), vec!["cheese", "bun"]);
        order.push_component("cheese").unwrap();
        assert_eq!(order.available_components(), vec!["bun"]);
    }
}
