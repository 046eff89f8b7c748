use std::collections::HashMap;

use rand::Rng;

use super::model::{BOUNDARY_MARKER, Recipe};
use crate::error::{BurgerError, Result};

/// Built-in menu: (order name, interior components). Every entry is wrapped in
/// [`BOUNDARY_MARKER`] on both ends when the catalog is built.
const BUILTIN_MENU: &[(&str, &[&str])] = &[
    ("cheeseburger", &["patty", "cheese"]),
    ("double cheeseburger", &["patty", "cheese", "cheese"]),
    ("shrimp burger", &["shrimp patty", "tartar sauce", "lettuce"]),
    ("bulgogi burger", &["bulgogi patty", "lettuce", "sauce"]),
    ("bacon burger", &["patty", "bacon", "cheese", "sauce"]),
];

const BUILTIN_DESCRIPTIONS: &[(&str, &str)] = &[
    ("bun", "a round, golden burger bun"),
    ("patty", "a grilled beef patty"),
    ("cheese", "a square slice of yellow cheese"),
    ("shrimp patty", "a crispy breaded shrimp patty"),
    ("tartar sauce", "a dollop of creamy white tartar sauce"),
    ("lettuce", "a fresh green lettuce leaf"),
    ("bulgogi patty", "a glazed bulgogi beef patty"),
    ("sauce", "a swirl of burger sauce"),
    ("bacon", "a couple of crispy bacon strips"),
];

/// Fixed set of recipes the game deals orders from.
///
/// The catalog is validated once on construction: it must not be empty and every
/// recipe must have at least two components, starting and ending with the boundary
/// marker. Nothing re-checks these rules later.
#[derive(Debug, Clone)]
pub struct RecipeCatalog {
    recipes: Vec<Recipe>,
    descriptions: HashMap<String, String>,
}

impl RecipeCatalog {
    /// Builds a catalog, rejecting recipes that break the authoring rules.
    pub fn new(recipes: Vec<Recipe>, descriptions: HashMap<String, String>) -> Result<Self> {
        if recipes.is_empty() {
            return Err(BurgerError::config("recipe catalog is empty"));
        }

        for recipe in &recipes {
            if recipe.components.len() < 2 {
                return Err(BurgerError::config(format!(
                    "recipe '{}' needs at least two components",
                    recipe.name
                )));
            }
            let wrapped = recipe.components.first().map(String::as_str) == Some(BOUNDARY_MARKER)
                && recipe.components.last().map(String::as_str) == Some(BOUNDARY_MARKER);
            if !wrapped {
                return Err(BurgerError::config(format!(
                    "recipe '{}' must start and end with '{}'",
                    recipe.name, BOUNDARY_MARKER
                )));
            }
        }

        let mut names: Vec<&str> = recipes.iter().map(|r| r.name.as_str()).collect();
        names.sort_unstable();
        if let Some(dup) = names.windows(2).find(|pair| pair[0] == pair[1]) {
            return Err(BurgerError::config(format!(
                "recipe '{}' is defined more than once",
                dup[0]
            )));
        }

        Ok(Self {
            recipes,
            descriptions,
        })
    }

    /// The menu shipped with the game.
    pub fn builtin() -> Self {
        let recipes = BUILTIN_MENU
            .iter()
            .map(|(name, interior)| {
                let mut components = Vec::with_capacity(interior.len() + 2);
                components.push(BOUNDARY_MARKER.to_string());
                components.extend(interior.iter().map(|c| c.to_string()));
                components.push(BOUNDARY_MARKER.to_string());
                Recipe::new(*name, components)
            })
            .collect();

        let descriptions = BUILTIN_DESCRIPTIONS
            .iter()
            .map(|(component, text)| (component.to_string(), text.to_string()))
            .collect();

        Self {
            recipes,
            descriptions,
        }
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn get(&self, name: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.name == name)
    }

    /// Picks a recipe uniformly at random.
    pub fn random_recipe<R: Rng + ?Sized>(&self, rng: &mut R) -> &Recipe {
        // Non-empty is guaranteed by construction.
        &self.recipes[rng.gen_range(0..self.recipes.len())]
    }

    /// Text sent to the quality oracle for a component; the identifier itself
    /// when no description was configured.
    pub fn describe<'a>(&'a self, component: &'a str) -> &'a str {
        self.descriptions
            .get(component)
            .map(String::as_str)
            .unwrap_or(component)
    }
}

impl Default for RecipeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn components(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_builtin_recipes_are_wrapped_in_boundary() {
        let catalog = RecipeCatalog::builtin();
        assert_eq!(catalog.recipes().len(), 5);
        for recipe in catalog.recipes() {
            assert!(recipe.components.len() >= 2);
            assert_eq!(recipe.components.first().unwrap(), BOUNDARY_MARKER);
            assert_eq!(recipe.components.last().unwrap(), BOUNDARY_MARKER);
        }
    }

    #[test]
    fn test_builtin_passes_validation() {
        let builtin = RecipeCatalog::builtin();
        let rebuilt = RecipeCatalog::new(builtin.recipes.clone(), builtin.descriptions.clone());
        assert!(rebuilt.is_ok());
    }

    #[test]
    fn test_rejects_unwrapped_recipe() {
        let err = RecipeCatalog::new(
            vec![Recipe::new("open burger", components(&["bun", "patty"]))],
            HashMap::new(),
        )
        .unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("open burger"));
    }

    #[test]
    fn test_rejects_short_and_empty_catalogs() {
        assert!(RecipeCatalog::new(Vec::new(), HashMap::new()).is_err());
        assert!(
            RecipeCatalog::new(
                vec![Recipe::new("crumb", components(&["bun"]))],
                HashMap::new()
            )
            .is_err()
        );
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let recipe = Recipe::new("plain", components(&["bun", "bun"]));
        let err = RecipeCatalog::new(vec![recipe.clone(), recipe], HashMap::new()).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_random_recipe_reaches_every_entry() {
        let catalog = RecipeCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(catalog.random_recipe(&mut rng).name.clone());
        }
        assert_eq!(seen.len(), catalog.recipes().len());
    }

    #[test]
    fn test_describe_falls_back_to_identifier() {
        let catalog = RecipeCatalog::builtin();
        assert_eq!(catalog.describe("cheese"), "a square slice of yellow cheese");
        assert_eq!(catalog.describe("pickle"), "pickle");
    }

    #[test]
    fn test_get_by_name() {
        let catalog = RecipeCatalog::builtin();
        let recipe = catalog.get("double cheeseburger").unwrap();
        assert_eq!(recipe.required_count("cheese"), 2);
        assert!(catalog.get("pizza").is_none());
    }
}
