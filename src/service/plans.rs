//! Weekly plans, food bank options, meal swaps and shopping lists

use super::DietService;
use crate::catalog;
use crate::error::{DietError, DietResult};
use crate::models::{FoodBankEntry, Macros, MealType, PlanEntry, RecipeId, Supermarket, UserId};
use crate::observability::{metrics, DietEvent};
use crate::shopping::ShoppingList;
use crate::storage::Store;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A plan slot joined with its recipe
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlannedMeal {
    pub id: u64,
    pub day_of_week: u8,
    pub meal_type: MealType,
    pub recipe_id: RecipeId,
    pub recipe_name: &'static str,
    pub ingredients: &'static str,
    pub instructions: &'static str,
    pub supermarket: Option<Supermarket>,
    #[serde(flatten)]
    pub macros: Macros,
}

impl From<&PlanEntry> for PlannedMeal {
    fn from(entry: &PlanEntry) -> Self {
        let recipe = catalog::get(entry.recipe_id);
        Self {
            id: entry.id,
            day_of_week: entry.day_of_week,
            meal_type: entry.meal_type,
            recipe_id: entry.recipe_id,
            recipe_name: recipe.map_or("", |r| r.name),
            ingredients: recipe.map_or("", |r| r.ingredients),
            instructions: recipe.map_or("", |r| r.instructions),
            supermarket: recipe.map(|r| r.supermarket),
            macros: entry.macros,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CurrentPlan {
    pub week: u32,
    pub meals: Vec<PlannedMeal>,
    /// Summed macros per day of week
    pub daily_totals: BTreeMap<u8, Macros>,
}

impl CurrentPlan {
    fn from_entries(week: u32, entries: &[PlanEntry]) -> Self {
        let mut daily_totals: BTreeMap<u8, Macros> = BTreeMap::new();
        for entry in entries {
            *daily_totals.entry(entry.day_of_week).or_default() += entry.macros;
        }

        Self {
            week,
            meals: entries.iter().map(PlannedMeal::from).collect(),
            daily_totals,
        }
    }
}

/// A food bank entry joined with its recipe
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodBankOption {
    pub id: u64,
    pub recipe_id: RecipeId,
    pub meal_type: MealType,
    pub times_used: u32,
    pub added_week: u32,
    pub name: &'static str,
    #[serde(flatten)]
    pub macros: Macros,
    pub ingredients: &'static str,
    pub supermarket: Option<Supermarket>,
}

impl From<&FoodBankEntry> for FoodBankOption {
    fn from(entry: &FoodBankEntry) -> Self {
        let recipe = catalog::get(entry.recipe_id);
        Self {
            id: entry.id,
            recipe_id: entry.recipe_id,
            meal_type: entry.meal_type,
            times_used: entry.times_used,
            added_week: entry.added_week,
            name: recipe.map_or("", |r| r.name),
            macros: recipe.map(|r| r.macros).unwrap_or_default(),
            ingredients: recipe.map_or("", |r| r.ingredients),
            supermarket: recipe.map(|r| r.supermarket),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FoodBankOptions {
    pub options: Vec<FoodBankOption>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SwapRequest {
    pub user_id: UserId,
    pub day: u8,
    pub meal_type: MealType,
    pub new_recipe_id: RecipeId,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SwapResponse {
    pub success: bool,
    pub meal: PlannedMeal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ShoppingListResponse {
    pub week: u32,
    pub shopping_list: ShoppingList,
}

impl<S: Store> DietService<S> {
    /// This week's plan with recipe details. Empty when nothing was generated.
    pub async fn current_plan(&self, user_id: UserId) -> DietResult<CurrentPlan> {
        self.require_user(user_id).await?;
        let week = self.current_week();
        let entries = self.store.week_plan(user_id, week).await?;

        Ok(CurrentPlan::from_entries(week, &entries))
    }

    /// Redraw this week's plan from the food bank. Meal types added to the
    /// profile since the bank was seeded get their first recipe here.
    pub async fn generate_plan(&self, user_id: UserId) -> DietResult<CurrentPlan> {
        let profile = self.require_profile(user_id).await?;

        let bank = self.store.food_bank(user_id, None).await?;
        self.seed_missing_meal_types(user_id, profile.meal_types(), &bank)
            .await?;
        self.regenerate_week(&profile).await?;
        metrics().record(DietEvent::PlanGenerated);

        self.current_plan(user_id).await
    }

    pub async fn food_bank_options(
        &self,
        user_id: UserId,
        meal_type: Option<MealType>,
    ) -> DietResult<FoodBankOptions> {
        self.require_user(user_id).await?;
        let bank = self.store.food_bank(user_id, meal_type).await?;

        Ok(FoodBankOptions {
            options: bank.iter().map(FoodBankOption::from).collect(),
        })
    }

    /// Point one slot of this week's plan at another recipe of the same meal type
    pub async fn swap_meal(&self, request: SwapRequest) -> DietResult<SwapResponse> {
        let recipe = catalog::get(request.new_recipe_id)
            .ok_or_else(|| DietError::not_found("Recipe"))?;

        if recipe.meal_type != request.meal_type {
            return Err(DietError::invalid_input(format!(
                "recipe {} is a {} recipe, not {}",
                recipe.id, recipe.meal_type, request.meal_type
            )));
        }
        if !(1..=self.planner.days_per_week()).contains(&request.day) {
            return Err(DietError::invalid_input(format!(
                "day must be between 1 and {}",
                self.planner.days_per_week()
            )));
        }

        let week = self.current_week();
        let slot = self
            .store
            .update_plan_slot(request.user_id, week, request.day, recipe)
            .await?
            .ok_or_else(|| DietError::not_found("Plan slot"))?;

        let in_bank = self
            .store
            .increment_recipe_usage(request.user_id, recipe.id)
            .await?;
        if !in_bank {
            tracing::debug!(
                user_id = request.user_id,
                recipe_id = recipe.id,
                "Swapped in a recipe outside the food bank"
            );
        }

        metrics().record(DietEvent::MealSwapped);
        tracing::info!(
            user_id = request.user_id,
            day = request.day,
            meal_type = %request.meal_type,
            recipe_id = recipe.id,
            "Swapped meal"
        );

        Ok(SwapResponse {
            success: true,
            meal: PlannedMeal::from(&slot),
        })
    }

    pub async fn shopping_list(&self, user_id: UserId) -> DietResult<ShoppingListResponse> {
        self.require_user(user_id).await?;
        let week = self.current_week();
        let entries = self.store.week_plan(user_id, week).await?;

        metrics().record(DietEvent::ShoppingListBuilt);
        Ok(ShoppingListResponse {
            week,
            shopping_list: ShoppingList::from_plan(&entries),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, day: u8, recipe_id: RecipeId) -> PlanEntry {
        let recipe = catalog::get(recipe_id).unwrap();
        PlanEntry {
            id,
            user_id: 1,
            week_number: 3,
            day_of_week: day,
            meal_type: recipe.meal_type,
            recipe_id,
            macros: recipe.macros,
        }
    }

    #[test]
    fn test_daily_totals_sum_per_day() {
        let entries = vec![entry(1, 1, 1), entry(2, 1, 13), entry(3, 2, 25)];
        let plan = CurrentPlan::from_entries(3, &entries);

        let day_one = catalog::get(1).unwrap().macros.calories + catalog::get(13).unwrap().macros.calories;
        assert_eq!(plan.daily_totals[&1].calories, day_one);
        assert_eq!(
            plan.daily_totals[&2].calories,
            catalog::get(25).unwrap().macros.calories
        );
        assert_eq!(plan.meals.len(), 3);
        assert_eq!(plan.meals[1].recipe_name, catalog::get(13).unwrap().name);
    }

    #[test]
    fn test_planned_meal_serializes_flat_macros() {
        let meal = PlannedMeal::from(&entry(7, 4, 15));
        let json = serde_json::to_value(&meal).unwrap();

        assert_eq!(json["calories"], 420);
        assert_eq!(json["meal_type"], "lunch");
        assert_eq!(json["supermarket"], "lidl");
        assert_eq!(json["day_of_week"], 4);
    }
}
