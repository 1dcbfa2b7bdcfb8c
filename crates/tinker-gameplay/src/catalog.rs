//! Item and recipe catalog.
//!
//! The catalog is loaded once and never mutated afterwards. Recipes keep
//! their declaration order, which is the matcher's priority order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use tinker_common::{ItemId, RecipeId};
use tinker_kernel::{Shaped, ShapedPattern};

use crate::discovery::DiscoveredSet;

/// A catalog entry: base resource or crafted result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier
    pub id: ItemId,
    /// Display name
    pub name: String,
    /// Image reference
    #[serde(default)]
    pub image: String,
}

impl Item {
    /// Creates a new item.
    #[must_use]
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: image.into(),
        }
    }
}

/// A shaped crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe identifier
    pub id: RecipeId,
    /// Required arrangement
    #[serde(rename = "ingredients")]
    pub pattern: ShapedPattern,
    /// Produced item
    pub result: Item,
}

impl Recipe {
    /// Creates a new recipe.
    #[must_use]
    pub fn new(id: impl Into<RecipeId>, pattern: ShapedPattern, result: Item) -> Self {
        Self {
            id: id.into(),
            pattern,
            result,
        }
    }
}

impl Shaped for Recipe {
    fn pattern(&self) -> &ShapedPattern {
        &self.pattern
    }
}

/// Read-only registry of resources and recipes.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Base resources in declaration order
    resources: Vec<Item>,
    /// Recipes in declaration order
    recipes: Vec<Recipe>,
    /// Resource position by id
    resource_index: HashMap<ItemId, usize>,
    /// First recipe producing an item, by result id
    result_index: HashMap<ItemId, usize>,
    /// Recipe position by recipe id
    recipe_index: HashMap<RecipeId, usize>,
}

impl Catalog {
    /// Creates a catalog. Earlier entries win when ids repeat.
    #[must_use]
    pub fn new(resources: Vec<Item>, recipes: Vec<Recipe>) -> Self {
        let mut resource_index = HashMap::with_capacity(resources.len());
        for (i, item) in resources.iter().enumerate() {
            resource_index.entry(item.id.clone()).or_insert(i);
        }

        let mut result_index = HashMap::with_capacity(recipes.len());
        let mut recipe_index = HashMap::with_capacity(recipes.len());
        for (i, recipe) in recipes.iter().enumerate() {
            result_index.entry(recipe.result.id.clone()).or_insert(i);
            recipe_index.entry(recipe.id.clone()).or_insert(i);
        }

        Self {
            resources,
            recipes,
            resource_index,
            result_index,
            recipe_index,
        }
    }

    /// Looks up an item, searching resources first, then recipe results.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<&Item> {
        self.resource(id).or_else(|| {
            self.result_index
                .get(id)
                .map(|&i| &self.recipes[i].result)
        })
    }

    /// Looks up a base resource.
    #[must_use]
    pub fn resource(&self, id: &str) -> Option<&Item> {
        self.resource_index.get(id).map(|&i| &self.resources[i])
    }

    /// Checks if an id names a base resource.
    #[must_use]
    pub fn is_resource(&self, id: &str) -> bool {
        self.resource_index.contains_key(id)
    }

    /// Looks up a recipe by its id.
    #[must_use]
    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipe_index.get(id).map(|&i| &self.recipes[i])
    }

    /// All base resources.
    #[must_use]
    pub fn resources(&self) -> &[Item] {
        &self.resources
    }

    /// All recipes, in priority order.
    #[must_use]
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Resolves discovered ids to items, skipping ids the catalog doesn't know.
    #[must_use]
    pub fn resolve_discovered<'a>(&'a self, discovered: &DiscoveredSet) -> Vec<&'a Item> {
        discovered
            .iter()
            .filter_map(|id| self.find_by_id(id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(
            vec![
                Item::new("wood", "Wood", "wood.png"),
                Item::new("stone", "Stone", "stone.png"),
            ],
            vec![
                Recipe::new(
                    "plank-recipe",
                    ShapedPattern::from_ids(&[&[Some("wood")]]),
                    Item::new("plank", "Plank", "plank.png"),
                ),
                Recipe::new(
                    "alt-plank",
                    ShapedPattern::from_ids(&[&[Some("wood"), Some("wood")]]),
                    Item::new("plank", "Plank (alt)", "plank2.png"),
                ),
                Recipe::new(
                    "fake-wood",
                    ShapedPattern::from_ids(&[&[Some("stone")]]),
                    Item::new("wood", "Petrified Wood", "wood2.png"),
                ),
            ],
        )
    }

    #[test]
    fn test_find_by_id_prefers_resources() {
        let catalog = catalog();
        let wood = catalog.find_by_id("wood").expect("wood exists");
        assert_eq!(wood.name, "Wood");
    }

    #[test]
    fn test_find_by_id_falls_back_to_first_result() {
        let catalog = catalog();
        let plank = catalog.find_by_id("plank").expect("plank exists");
        assert_eq!(plank.name, "Plank");
    }

    #[test]
    fn test_find_by_id_not_found() {
        assert!(catalog().find_by_id("diamond").is_none());
    }

    #[test]
    fn test_recipe_lookup_and_order() {
        let catalog = catalog();
        assert_eq!(
            catalog.recipe("alt-plank").map(|r| r.result.name.as_str()),
            Some("Plank (alt)")
        );
        let ids: Vec<_> = catalog.recipes().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["plank-recipe", "alt-plank", "fake-wood"]);
    }

    #[test]
    fn test_resolve_discovered_skips_unknown() {
        let catalog = catalog();
        let mut discovered = DiscoveredSet::new();
        discovered.insert(ItemId::new("plank"));
        discovered.insert(ItemId::new("ghost"));

        let items = catalog.resolve_discovered(&discovered);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id.as_str(), "plank");
    }

    #[test]
    fn test_recipe_json_shape() {
        let json = r#"{
            "id": "torch",
            "ingredients": [["coal"], ["stick"]],
            "result": { "id": "torch", "name": "Torch", "image": "torch.png" }
        }"#;
        let recipe: Recipe = serde_json::from_str(json).expect("deserialize");
        assert_eq!(recipe.pattern.height(), 2);
        assert_eq!(recipe.result.id.as_str(), "torch");
    }
}
