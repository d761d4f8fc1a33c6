//! Mock implementations for testing
//!
//! [`MockStore`] wraps a [`MemoryStore`] and can be switched into a failing mode,
//! and [`FixedClock`] pins the current time and week number.

use crate::clock::WeekClock;
use crate::error::{DietError, DietResult};
use crate::models::{
    FoodBankEntry, MealType, PlanEntry, Profile, Recipe, RecipeId, User, UserId, WeightEntry,
};
use crate::storage::{MemoryStore, NewPlanEntry, NewUser, Store};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

/// In-memory store that fails every call while `should_fail` is set
#[derive(Debug, Default)]
pub struct MockStore {
    inner: MemoryStore,
    should_fail: AtomicBool,
    calls: Mutex<Vec<&'static str>>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.should_fail.store(failing, Ordering::SeqCst);
    }

    /// Names of the store methods called so far, in order
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn check(&self, operation: &'static str) -> DietResult<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(operation);
        }
        if self.should_fail.load(Ordering::SeqCst) {
            Err(DietError::storage(format!(
                "Mock {operation} failure: connection refused password=hunter2"
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Store for MockStore {
    async fn ping(&self) -> DietResult<()> {
        self.check("ping")?;
        self.inner.ping().await
    }

    async fn create_user(&self, user: NewUser) -> DietResult<User> {
        self.check("create_user")?;
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: UserId) -> DietResult<Option<User>> {
        self.check("get_user")?;
        self.inner.get_user(user_id).await
    }

    async fn find_user_by_email(&self, email: &str) -> DietResult<Option<User>> {
        self.check("find_user_by_email")?;
        self.inner.find_user_by_email(email).await
    }

    async fn upsert_profile(&self, profile: Profile) -> DietResult<()> {
        self.check("upsert_profile")?;
        self.inner.upsert_profile(profile).await
    }

    async fn get_profile(&self, user_id: UserId) -> DietResult<Option<Profile>> {
        self.check("get_profile")?;
        self.inner.get_profile(user_id).await
    }

    async fn add_weight(&self, entry: WeightEntry) -> DietResult<()> {
        self.check("add_weight")?;
        self.inner.add_weight(entry).await
    }

    async fn weight_history(&self, user_id: UserId) -> DietResult<Vec<WeightEntry>> {
        self.check("weight_history")?;
        self.inner.weight_history(user_id).await
    }

    async fn food_bank(
        &self,
        user_id: UserId,
        meal_type: Option<MealType>,
    ) -> DietResult<Vec<FoodBankEntry>> {
        self.check("food_bank")?;
        self.inner.food_bank(user_id, meal_type).await
    }

    async fn add_food_bank_entry(
        &self,
        user_id: UserId,
        meal_type: MealType,
        recipe_id: RecipeId,
        added_week: u32,
    ) -> DietResult<FoodBankEntry> {
        self.check("add_food_bank_entry")?;
        self.inner
            .add_food_bank_entry(user_id, meal_type, recipe_id, added_week)
            .await
    }

    async fn increment_recipe_usage(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> DietResult<bool> {
        self.check("increment_recipe_usage")?;
        self.inner.increment_recipe_usage(user_id, recipe_id).await
    }

    async fn replace_week_plan(
        &self,
        user_id: UserId,
        week_number: u32,
        entries: Vec<NewPlanEntry>,
    ) -> DietResult<Vec<PlanEntry>> {
        self.check("replace_week_plan")?;
        self.inner
            .replace_week_plan(user_id, week_number, entries)
            .await
    }

    async fn week_plan(&self, user_id: UserId, week_number: u32) -> DietResult<Vec<PlanEntry>> {
        self.check("week_plan")?;
        self.inner.week_plan(user_id, week_number).await
    }

    async fn update_plan_slot(
        &self,
        user_id: UserId,
        week_number: u32,
        day_of_week: u8,
        recipe: &Recipe,
    ) -> DietResult<Option<PlanEntry>> {
        self.check("update_plan_slot")?;
        self.inner
            .update_plan_slot(user_id, week_number, day_of_week, recipe)
            .await
    }
}

/// Clock pinned to one instant. The week number can be advanced by tests.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
    week: AtomicU32,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, week: u32) -> Self {
        Self {
            now: Mutex::new(now),
            week: AtomicU32::new(week),
        }
    }

    pub fn set_week(&self, week: u32) {
        self.week.store(week, Ordering::SeqCst);
    }

    /// Move the clock to `now`, which falls in ISO week `week`
    pub fn set_time(&self, now: DateTime<Utc>, week: u32) {
        if let Ok(mut current) = self.now.lock() {
            *current = now;
        }
        self.set_week(week);
    }
}

impl Default for FixedClock {
    /// Monday 2024-03-04, ISO week 10
    fn default() -> Self {
        let now = Utc
            .with_ymd_and_hms(2024, 3, 4, 9, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        Self::new(now, 10)
    }
}

impl WeekClock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
            .lock()
            .map(|now| *now)
            .unwrap_or_else(|poisoned| *poisoned.into_inner())
    }

    fn current_week(&self) -> u32 {
        self.week.load(Ordering::SeqCst)
    }
}
