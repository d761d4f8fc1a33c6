//! Persistence layer
//!
//! The [`Store`] trait abstracts over where users, profiles, weight history,
//! food banks and weekly plans live, so the service layer can be exercised
//! against failing or in-memory stores in tests.

use crate::error::DietResult;
use crate::models::{
    FoodBankEntry, Macros, MealType, PlanEntry, Profile, Recipe, RecipeId, User, UserId,
    WeightEntry,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub mod memory;

pub use memory::MemoryStore;

/// User record before an id is assigned
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
}

/// Plan slot before an id is assigned
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlanEntry {
    pub day_of_week: u8,
    pub meal_type: MealType,
    pub recipe_id: RecipeId,
    pub macros: Macros,
}

impl NewPlanEntry {
    pub fn from_recipe(day_of_week: u8, recipe: &Recipe) -> Self {
        Self {
            day_of_week,
            meal_type: recipe.meal_type,
            recipe_id: recipe.id,
            macros: recipe.macros,
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the health endpoint
    async fn ping(&self) -> DietResult<()>;

    /// Insert a user. Fails with a conflict when the email is taken.
    async fn create_user(&self, user: NewUser) -> DietResult<User>;

    async fn get_user(&self, user_id: UserId) -> DietResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> DietResult<Option<User>>;

    /// Insert or replace the profile of `profile.user_id`
    async fn upsert_profile(&self, profile: Profile) -> DietResult<()>;

    async fn get_profile(&self, user_id: UserId) -> DietResult<Option<Profile>>;

    async fn add_weight(&self, entry: WeightEntry) -> DietResult<()>;

    /// Weight entries ordered by week number, then recording time
    async fn weight_history(&self, user_id: UserId) -> DietResult<Vec<WeightEntry>>;

    /// Food bank entries, optionally restricted to one meal type, ordered by id
    async fn food_bank(
        &self,
        user_id: UserId,
        meal_type: Option<MealType>,
    ) -> DietResult<Vec<FoodBankEntry>>;

    async fn add_food_bank_entry(
        &self,
        user_id: UserId,
        meal_type: MealType,
        recipe_id: RecipeId,
        added_week: u32,
    ) -> DietResult<FoodBankEntry>;

    /// Bump `times_used` of the matching bank entries. Returns whether any matched.
    async fn increment_recipe_usage(&self, user_id: UserId, recipe_id: RecipeId)
        -> DietResult<bool>;

    /// Replace every slot of the user's plan for `week_number`
    async fn replace_week_plan(
        &self,
        user_id: UserId,
        week_number: u32,
        entries: Vec<NewPlanEntry>,
    ) -> DietResult<Vec<PlanEntry>>;

    /// Plan slots ordered by day, then meal type
    async fn week_plan(&self, user_id: UserId, week_number: u32) -> DietResult<Vec<PlanEntry>>;

    /// Point the slot of `recipe.meal_type` on `day_of_week` at `recipe`.
    /// Returns `None` when the slot does not exist.
    async fn update_plan_slot(
        &self,
        user_id: UserId,
        week_number: u32,
        day_of_week: u8,
        recipe: &Recipe,
    ) -> DietResult<Option<PlanEntry>>;
}
