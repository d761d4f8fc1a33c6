//! Diet planning operations
//!
//! [`DietService`] owns the store, the week clock, the planner and the random
//! source, and exposes one async method per API operation. Request and response
//! types live next to the operations that use them.

pub mod accounts;
pub mod health;
pub mod plans;
pub mod progress;

pub use accounts::{
    LoginRequest, LoginResponse, ProfileRequest, ProfileResponse, RegisterRequest,
    RegisterResponse,
};
pub use health::{HealthCheck, HealthStatus};
pub use plans::{
    CurrentPlan, FoodBankOption, FoodBankOptions, PlannedMeal, ShoppingListResponse, SwapRequest,
    SwapResponse,
};
pub use progress::{CheckinRequest, CheckinResponse, Stats, WeightPoint};

use crate::clock::WeekClock;
use crate::config::PlannerSection;
use crate::error::{DietError, DietResult};
use crate::models::{FoodBankEntry, MealType, Profile, Recipe, User, UserId};
use crate::planner::Planner;
use crate::storage::Store;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

pub struct DietService<S: Store> {
    store: Arc<S>,
    clock: Arc<dyn WeekClock>,
    planner: Planner,
    rng: Mutex<StdRng>,
    started_at: Instant,
}

impl<S: Store> DietService<S> {
    /// Without `config.seed` the random source is seeded from OS entropy.
    pub fn new(store: Arc<S>, clock: Arc<dyn WeekClock>, config: &PlannerSection) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            store,
            clock,
            planner: Planner::from_config(config),
            rng: Mutex::new(rng),
            started_at: Instant::now(),
        }
    }

    pub fn current_week(&self) -> u32 {
        self.clock.current_week()
    }

    /// Run `f` with the shared random source. The lock is never held across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    async fn require_user(&self, user_id: UserId) -> DietResult<User> {
        self.store
            .get_user(user_id)
            .await?
            .ok_or_else(|| DietError::not_found("User"))
    }

    async fn require_profile(&self, user_id: UserId) -> DietResult<Profile> {
        self.store
            .get_profile(user_id)
            .await?
            .ok_or_else(|| DietError::not_found("Profile"))
    }

    /// Give every meal type without a bank entry one random recipe.
    /// Returns the recipes added.
    async fn seed_missing_meal_types(
        &self,
        user_id: UserId,
        meal_types: &[MealType],
        bank: &[FoodBankEntry],
    ) -> DietResult<Vec<&'static Recipe>> {
        let missing: Vec<MealType> = meal_types
            .iter()
            .copied()
            .filter(|meal_type| !bank.iter().any(|entry| entry.meal_type == *meal_type))
            .collect();

        let seeds = self.with_rng(|rng| self.planner.bank_additions(rng, &missing, bank));
        let week = self.current_week();
        for recipe in &seeds {
            self.store
                .add_food_bank_entry(user_id, recipe.meal_type, recipe.id, week)
                .await?;
        }

        Ok(seeds)
    }

    /// Replace the current week's plan with a fresh draw from the user's bank
    async fn regenerate_week(&self, profile: &Profile) -> DietResult<u32> {
        let bank = self.store.food_bank(profile.user_id, None).await?;
        let entries = self.with_rng(|rng| self.planner.build_week(rng, profile.meal_types(), &bank));
        let week = self.current_week();

        let stored = self
            .store
            .replace_week_plan(profile.user_id, week, entries)
            .await?;
        tracing::info!(
            user_id = profile.user_id,
            week,
            slots = stored.len(),
            "Generated weekly plan"
        );

        Ok(week)
    }
}
