//! Shopping list aggregation
//!
//! Ingredients of every distinct recipe in a plan, grouped by the supermarket
//! the recipe is bought at.

use crate::catalog;
use crate::models::{PlanEntry, Recipe, Supermarket};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Sorted, deduplicated ingredients per supermarket. Every supermarket has a
/// key, even when nothing is bought there.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShoppingList(BTreeMap<Supermarket, Vec<String>>);

impl ShoppingList {
    pub fn from_recipes<'a, I>(recipes: I) -> Self
    where
        I: IntoIterator<Item = &'a Recipe>,
    {
        let mut grouped: BTreeMap<Supermarket, BTreeSet<&'static str>> = Supermarket::ALL
            .iter()
            .map(|supermarket| (*supermarket, BTreeSet::new()))
            .collect();

        for recipe in recipes {
            grouped
                .entry(recipe.supermarket)
                .or_default()
                .extend(recipe.ingredient_list());
        }

        Self(
            grouped
                .into_iter()
                .map(|(supermarket, items)| {
                    (supermarket, items.into_iter().map(str::to_string).collect())
                })
                .collect(),
        )
    }

    /// Resolve plan slots against the catalog. Unknown recipe ids are ignored.
    pub fn from_plan(entries: &[PlanEntry]) -> Self {
        let recipe_ids: BTreeSet<_> = entries.iter().map(|entry| entry.recipe_id).collect();
        Self::from_recipes(recipe_ids.into_iter().filter_map(catalog::get))
    }

    pub fn items(&self, supermarket: Supermarket) -> &[String] {
        self.0.get(&supermarket).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Macros, MealType};

    fn slot(id: u64, day: u8, recipe_id: u64) -> PlanEntry {
        let recipe = catalog::get(recipe_id).unwrap();
        PlanEntry {
            id,
            user_id: 1,
            week_number: 10,
            day_of_week: day,
            meal_type: recipe.meal_type,
            recipe_id,
            macros: recipe.macros,
        }
    }

    #[test]
    fn test_empty_plan_has_all_keys() {
        let list = ShoppingList::from_plan(&[]);
        assert!(list.is_empty());

        let json = serde_json::to_value(&list).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"mercadona": [], "lidl": [], "mixed": []})
        );
    }

    #[test]
    fn test_groups_by_supermarket() {
        // 8 is bought at Mercadona, 15 at Lidl
        let list = ShoppingList::from_plan(&[slot(1, 1, 8), slot(2, 1, 15), slot(3, 1, 1)]);

        let expected_mercadona: Vec<String> = catalog::get(8)
            .unwrap()
            .ingredient_list()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        assert_eq!(list.items(Supermarket::Mercadona), expected_mercadona.as_slice());
        assert!(!list.items(Supermarket::Lidl).is_empty());
        assert!(!list.items(Supermarket::Mixed).is_empty());
    }

    #[test]
    fn test_repeated_recipes_are_deduplicated_and_sorted() {
        let entries: Vec<_> = (1..=7).map(|day| slot(u64::from(day), day, 1)).collect();
        let list = ShoppingList::from_plan(&entries);

        let items = list.items(Supermarket::Mixed);
        let expected = catalog::get(1).unwrap().ingredient_list().collect::<BTreeSet<_>>();
        assert_eq!(items.len(), expected.len());
        assert!(items.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_shared_ingredients_across_recipes() {
        let recipe = |id, ingredients| Recipe {
            id,
            name: "test",
            meal_type: MealType::Lunch,
            macros: Macros::default(),
            ingredients,
            instructions: "",
            supermarket: Supermarket::Lidl,
            category: "test",
        };
        let a = recipe(100, "arroz, pollo ,  sal");
        let b = recipe(101, "sal,aceite,");

        let list = ShoppingList::from_recipes([&a, &b]);
        assert_eq!(list.items(Supermarket::Lidl), ["aceite", "arroz", "pollo", "sal"]);
    }
}
