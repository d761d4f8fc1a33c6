//! In-process store with optional JSON snapshot persistence
//!
//! All tables sit behind one `RwLock`. When opened with a path, every mutation
//! is applied to a copy of the tables, the copy is written as the new snapshot
//! (temp file, then rename) while the write lock is held, and only then swapped
//! in. A failed write leaves both memory and disk at the previous state.

use super::{NewPlanEntry, NewUser, Store};
use crate::error::{DietError, DietResult};
use crate::models::{
    FoodBankEntry, MealType, PlanEntry, Profile, Recipe, RecipeId, User, UserId, WeightEntry,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    next_user_id: u64,
    next_bank_id: u64,
    next_plan_id: u64,
    users: BTreeMap<UserId, User>,
    profiles: BTreeMap<UserId, Profile>,
    weight_history: Vec<WeightEntry>,
    food_bank: Vec<FoodBankEntry>,
    weekly_plans: Vec<PlanEntry>,
}

impl Tables {
    fn allocate(counter: &mut u64) -> u64 {
        *counter += 1;
        *counter
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Volatile store, lost on restart
    pub fn new() -> Self {
        Self::default()
    }

    /// Store backed by a JSON snapshot file. A missing file starts empty.
    pub async fn open(path: impl AsRef<Path>) -> DietResult<Self> {
        let path = path.as_ref().to_path_buf();

        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                DietError::storage(format!("corrupt snapshot {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No snapshot at {}, starting empty", path.display());
                Tables::default()
            }
            Err(e) => {
                return Err(DietError::storage(format!(
                    "failed to read snapshot {}: {e}",
                    path.display()
                )))
            }
        };

        info!(
            users = tables.users.len(),
            plans = tables.weekly_plans.len(),
            "Opened snapshot {}",
            path.display()
        );

        Ok(Self {
            tables: RwLock::new(tables),
            snapshot_path: Some(path),
        })
    }

    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    /// Apply `change` and persist the result; nothing is kept if either fails
    async fn mutate<T, F>(&self, change: F) -> DietResult<T>
    where
        F: FnOnce(&mut Tables) -> DietResult<T> + Send,
        T: Send,
    {
        let mut tables = self.tables.write().await;
        let Some(path) = &self.snapshot_path else {
            return change(&mut tables);
        };

        let mut staged = tables.clone();
        let output = change(&mut staged)?;
        Self::persist(path, &staged).await?;
        *tables = staged;
        Ok(output)
    }

    async fn persist(path: &Path, tables: &Tables) -> DietResult<()> {
        let bytes = serde_json::to_vec(tables)
            .map_err(|e| DietError::storage(format!("failed to encode snapshot: {e}")))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| DietError::storage(format!("failed to create {}: {e}", parent.display())))?;
        }

        let tmp_path = path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, &bytes)
            .await
            .map_err(|e| DietError::storage(format!("failed to write snapshot: {e}")))?;
        tokio::fs::rename(&tmp_path, path)
            .await
            .map_err(|e| DietError::storage(format!("failed to replace snapshot: {e}")))?;

        debug!(bytes = bytes.len(), "Snapshot written to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> DietResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> DietResult<User> {
        self.mutate(|tables| {
            if tables.users.values().any(|u| u.email == user.email) {
                return Err(DietError::conflict("Email already registered"));
            }

            let id = Tables::allocate(&mut tables.next_user_id);
            let user = User {
                id,
                email: user.email,
                name: user.name,
                password_hash: user.password_hash,
                password_salt: user.password_salt,
                created_at: user.created_at,
            };
            tables.users.insert(id, user.clone());
            Ok(user)
        })
        .await
    }

    async fn get_user(&self, user_id: UserId) -> DietResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> DietResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn upsert_profile(&self, profile: Profile) -> DietResult<()> {
        self.mutate(|tables| {
            tables.profiles.insert(profile.user_id, profile);
            Ok(())
        })
        .await
    }

    async fn get_profile(&self, user_id: UserId) -> DietResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&user_id).cloned())
    }

    async fn add_weight(&self, entry: WeightEntry) -> DietResult<()> {
        self.mutate(|tables| {
            tables.weight_history.push(entry);
            Ok(())
        })
        .await
    }

    async fn weight_history(&self, user_id: UserId) -> DietResult<Vec<WeightEntry>> {
        let tables = self.tables.read().await;
        let mut history: Vec<WeightEntry> = tables
            .weight_history
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        history.sort_by_key(|entry| entry.recorded_at);
        Ok(history)
    }

    async fn food_bank(
        &self,
        user_id: UserId,
        meal_type: Option<MealType>,
    ) -> DietResult<Vec<FoodBankEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .food_bank
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .filter(|entry| meal_type.map_or(true, |t| entry.meal_type == t))
            .cloned()
            .collect())
    }

    async fn add_food_bank_entry(
        &self,
        user_id: UserId,
        meal_type: MealType,
        recipe_id: RecipeId,
        added_week: u32,
    ) -> DietResult<FoodBankEntry> {
        self.mutate(|tables| {
            let id = Tables::allocate(&mut tables.next_bank_id);
            let entry = FoodBankEntry {
                id,
                user_id,
                meal_type,
                recipe_id,
                times_used: 0,
                added_week,
            };
            tables.food_bank.push(entry.clone());
            Ok(entry)
        })
        .await
    }

    async fn increment_recipe_usage(
        &self,
        user_id: UserId,
        recipe_id: RecipeId,
    ) -> DietResult<bool> {
        {
            let tables = self.tables.read().await;
            if !tables
                .food_bank
                .iter()
                .any(|e| e.user_id == user_id && e.recipe_id == recipe_id)
            {
                return Ok(false);
            }
        }

        self.mutate(|tables| {
            let mut matched = false;
            for entry in tables
                .food_bank
                .iter_mut()
                .filter(|e| e.user_id == user_id && e.recipe_id == recipe_id)
            {
                entry.times_used += 1;
                matched = true;
            }
            Ok(matched)
        })
        .await
    }

    async fn replace_week_plan(
        &self,
        user_id: UserId,
        week_number: u32,
        entries: Vec<NewPlanEntry>,
    ) -> DietResult<Vec<PlanEntry>> {
        let mut created = self
            .mutate(|tables| {
                tables
                    .weekly_plans
                    .retain(|e| !(e.user_id == user_id && e.week_number == week_number));

                let mut created = Vec::with_capacity(entries.len());
                for new_entry in entries {
                    let id = Tables::allocate(&mut tables.next_plan_id);
                    created.push(PlanEntry {
                        id,
                        user_id,
                        week_number,
                        day_of_week: new_entry.day_of_week,
                        meal_type: new_entry.meal_type,
                        recipe_id: new_entry.recipe_id,
                        macros: new_entry.macros,
                    });
                }
                tables.weekly_plans.extend(created.iter().cloned());
                Ok(created)
            })
            .await?;
        created.sort_by_key(|e| (e.day_of_week, e.meal_type));
        Ok(created)
    }

    async fn week_plan(&self, user_id: UserId, week_number: u32) -> DietResult<Vec<PlanEntry>> {
        let tables = self.tables.read().await;
        let mut plan: Vec<PlanEntry> = tables
            .weekly_plans
            .iter()
            .filter(|e| e.user_id == user_id && e.week_number == week_number)
            .cloned()
            .collect();
        plan.sort_by_key(|e| (e.day_of_week, e.meal_type));
        Ok(plan)
    }

    async fn update_plan_slot(
        &self,
        user_id: UserId,
        week_number: u32,
        day_of_week: u8,
        recipe: &Recipe,
    ) -> DietResult<Option<PlanEntry>> {
        let is_slot = |e: &PlanEntry| {
            e.user_id == user_id
                && e.week_number == week_number
                && e.day_of_week == day_of_week
                && e.meal_type == recipe.meal_type
        };

        if !self.tables.read().await.weekly_plans.iter().any(|e| is_slot(e)) {
            return Ok(None);
        }

        self.mutate(|tables| {
            Ok(tables.weekly_plans.iter_mut().find(|e| is_slot(&**e)).map(|entry| {
                entry.recipe_id = recipe.id;
                entry.macros = recipe.macros;
                entry.clone()
            }))
        })
        .await
    }
}
