//! Calorie target computation
//!
//! Basal metabolic rate uses the Mifflin-St Jeor equation. Daily expenditure is
//! the BMR scaled by the activity multiplier, and the target adds a goal based
//! deficit or surplus on top of it.

use crate::models::{ActivityLevel, Gender, GoalType};
use serde::Serialize;

/// Largest daily deficit applied when losing weight
pub const MAX_DEFICIT_KCAL: f64 = 500.0;
/// Deficit applied before scaling by the remaining distance to the goal
pub const BASE_DEFICIT_KCAL: f64 = 300.0;
/// Extra deficit per kilogram still to lose
pub const DEFICIT_PER_KG: f64 = 20.0;
/// Daily surplus applied when gaining weight
pub const SURPLUS_KCAL: f64 = 300.0;

/// Mifflin-St Jeor basal metabolic rate in kcal/day
pub fn basal_metabolic_rate(age: u32, gender: Gender, height_cm: f64, weight_kg: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure in kcal/day
pub fn energy_expenditure(bmr: f64, activity: ActivityLevel) -> f64 {
    bmr * activity.multiplier()
}

/// Daily intake target for the given goal.
///
/// With a `Lose` goal above the current weight the deficit shrinks below the
/// base deficit, and turns into a surplus once the gap passes 15 kg.
pub fn target_calories(tdee: f64, goal: GoalType, current_weight_kg: f64, goal_weight_kg: f64) -> f64 {
    match goal {
        GoalType::Lose => {
            let remaining = current_weight_kg - goal_weight_kg;
            tdee - MAX_DEFICIT_KCAL.min(BASE_DEFICIT_KCAL + remaining * DEFICIT_PER_KG)
        }
        GoalType::Gain => tdee + SURPLUS_KCAL,
        GoalType::Maintain => tdee,
    }
}

/// Rounded calorie figures reported to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalorieTargets {
    pub bmr: i64,
    pub tdee: i64,
    pub target_calories: i64,
}

/// Inputs needed to compute [`CalorieTargets`]
#[derive(Debug, Clone, Copy)]
pub struct BodyMetrics {
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub activity_level: ActivityLevel,
}

impl CalorieTargets {
    /// BMR and TDEE are rounded half to even; TDEE is derived from the
    /// unrounded BMR. The target is computed from the rounded TDEE and truncated.
    pub fn compute(body: &BodyMetrics, goal: GoalType, goal_weight_kg: f64) -> Self {
        let bmr = basal_metabolic_rate(body.age, body.gender, body.height_cm, body.weight_kg);
        let tdee = energy_expenditure(bmr, body.activity_level).round_ties_even();
        let target = target_calories(tdee, goal, body.weight_kg, goal_weight_kg);

        Self {
            bmr: bmr.round_ties_even() as i64,
            tdee: tdee as i64,
            target_calories: target.trunc() as i64,
        }
    }
}
