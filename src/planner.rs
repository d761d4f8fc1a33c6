//! Food bank rotation and weekly plan generation
//!
//! Each user owns a food bank: per meal type, a bounded pool of catalog recipes
//! unlocked over time. A new user starts with one recipe per meal type, and
//! every weight check-in unlocks one more per meal type until the bound is hit.
//! Weekly plans pick uniformly at random from the pool of each slot.
//!
//! Everything here is pure; the service layer reads and writes the store.

use crate::catalog;
use crate::config::PlannerSection;
use crate::models::{FoodBankEntry, MealType, Recipe};
use crate::storage::NewPlanEntry;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planner {
    max_options_per_meal: usize,
    days_per_week: u8,
}

impl Default for Planner {
    fn default() -> Self {
        Self::from_config(&PlannerSection::default())
    }
}

impl Planner {
    pub fn from_config(config: &PlannerSection) -> Self {
        Self {
            max_options_per_meal: config.max_options_per_meal,
            days_per_week: config.days_per_week,
        }
    }

    pub fn max_options_per_meal(&self) -> usize {
        self.max_options_per_meal
    }

    pub fn days_per_week(&self) -> u8 {
        self.days_per_week
    }

    /// Random catalog recipe of `meal_type` that is not already in `bank`
    pub fn pick_unused_recipe<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        meal_type: MealType,
        bank: &[FoodBankEntry],
    ) -> Option<&'static Recipe> {
        let used: HashSet<_> = bank
            .iter()
            .filter(|entry| entry.meal_type == meal_type)
            .map(|entry| entry.recipe_id)
            .collect();

        catalog::by_meal_type(meal_type)
            .filter(|recipe| !used.contains(&recipe.id))
            .choose(rng)
    }

    /// One new recipe for every meal type whose pool is below the bound.
    /// Meal types whose catalog is exhausted are skipped.
    pub fn bank_additions<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        meal_types: &[MealType],
        bank: &[FoodBankEntry],
    ) -> Vec<&'static Recipe> {
        meal_types
            .iter()
            .filter(|meal_type| {
                bank.iter().filter(|e| e.meal_type == **meal_type).count()
                    < self.max_options_per_meal
            })
            .filter_map(|meal_type| self.pick_unused_recipe(rng, *meal_type, bank))
            .collect()
    }

    /// Fill every day and meal slot from the bank. Slots whose meal type has
    /// no bank entry are left out.
    pub fn build_week<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        meal_types: &[MealType],
        bank: &[FoodBankEntry],
    ) -> Vec<NewPlanEntry> {
        let pools: Vec<Vec<&'static Recipe>> = meal_types
            .iter()
            .map(|meal_type| {
                bank.iter()
                    .filter(|entry| entry.meal_type == *meal_type)
                    .filter_map(|entry| catalog::get(entry.recipe_id))
                    .collect()
            })
            .collect();

        let mut entries = Vec::with_capacity(usize::from(self.days_per_week) * meal_types.len());
        for day in 1..=self.days_per_week {
            for pool in &pools {
                if let Some(recipe) = pool.choose(rng) {
                    entries.push(NewPlanEntry::from_recipe(day, recipe));
                }
            }
        }
        entries
    }
}
