//! Weight check-ins and progress statistics

use super::accounts::WEIGHT_RANGE_KG;
use super::DietService;
use crate::error::{DietError, DietResult};
use crate::models::{Profile, Recipe, UserId, WeightEntry};
use crate::nutrition::{BodyMetrics, CalorieTargets};
use crate::observability::{metrics, DietEvent};
use crate::storage::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct CheckinRequest {
    pub user_id: UserId,
    #[serde(alias = "weight_kg")]
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckinResponse {
    pub success: bool,
    pub week: u32,
    pub new_target_calories: i64,
    /// Recipes unlocked in the food bank by this check-in
    pub added_recipes: Vec<&'static Recipe>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeightPoint {
    pub weight_kg: f64,
    pub week_number: u32,
    pub recorded_at: DateTime<Utc>,
}

impl From<WeightEntry> for WeightPoint {
    fn from(entry: WeightEntry) -> Self {
        Self {
            weight_kg: entry.weight_kg,
            week_number: entry.week_number,
            recorded_at: entry.recorded_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Stats {
    pub weight_history: Vec<WeightPoint>,
    pub starting_weight: f64,
    pub current_weight: f64,
    pub goal_weight: f64,
    pub progress_percent: f64,
}

/// Share of the distance from `start` to `goal` already covered, in percent
/// with one decimal. Zero when there is nothing to lose.
pub fn progress_percent(start: f64, current: f64, goal: f64) -> f64 {
    let distance = start - goal;
    if distance <= 0.0 {
        return 0.0;
    }

    let percent = (start - current) / distance * 100.0;
    (percent * 10.0).round_ties_even() / 10.0
}

impl<S: Store> DietService<S> {
    /// Log a weight, unlock one more food bank recipe per meal type, and
    /// recompute the calorie target for the new weight.
    pub async fn weight_checkin(&self, request: CheckinRequest) -> DietResult<CheckinResponse> {
        if !WEIGHT_RANGE_KG.contains(&request.weight) {
            return Err(DietError::invalid_input(format!(
                "weight must be between {} and {} kg",
                WEIGHT_RANGE_KG.start(),
                WEIGHT_RANGE_KG.end()
            )));
        }

        let profile = self.require_profile(request.user_id).await?;
        let week = self.current_week();
        let now = self.clock.now();

        self.store
            .add_weight(WeightEntry {
                user_id: request.user_id,
                weight_kg: request.weight,
                week_number: week,
                recorded_at: now,
            })
            .await?;

        let bank = self.store.food_bank(request.user_id, None).await?;
        let added_recipes =
            self.with_rng(|rng| self.planner.bank_additions(rng, profile.meal_types(), &bank));
        for recipe in &added_recipes {
            self.store
                .add_food_bank_entry(request.user_id, recipe.meal_type, recipe.id, week)
                .await?;
        }
        if !added_recipes.is_empty() {
            metrics().record(DietEvent::FoodBankExpanded);
        }

        let targets = CalorieTargets::compute(
            &BodyMetrics {
                age: profile.age,
                gender: profile.gender,
                height_cm: profile.height_cm,
                weight_kg: request.weight,
                activity_level: profile.activity_level,
            },
            profile.goal_type,
            profile.goal_weight_kg,
        );

        self.store
            .upsert_profile(Profile {
                current_weight_kg: request.weight,
                target_calories: targets.target_calories,
                updated_at: now,
                ..profile
            })
            .await?;

        metrics().record(DietEvent::WeightCheckin);
        tracing::info!(
            user_id = request.user_id,
            week,
            weight_kg = request.weight,
            new_target_calories = targets.target_calories,
            recipes_added = added_recipes.len(),
            "Recorded weight check-in"
        );

        Ok(CheckinResponse {
            success: true,
            week,
            new_target_calories: targets.target_calories,
            added_recipes,
        })
    }

    pub async fn stats(&self, user_id: UserId) -> DietResult<Stats> {
        let profile = self.require_profile(user_id).await?;
        let history = self.store.weight_history(user_id).await?;

        let current_weight = history
            .last()
            .map_or(profile.starting_weight_kg, |entry| entry.weight_kg);

        Ok(Stats {
            progress_percent: progress_percent(
                profile.starting_weight_kg,
                current_weight,
                profile.goal_weight_kg,
            ),
            weight_history: history.into_iter().map(WeightPoint::from).collect(),
            starting_weight: profile.starting_weight_kg,
            current_weight,
            goal_weight: profile.goal_weight_kg,
        })
    }
}
