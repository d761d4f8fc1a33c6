//! Domain types shared by the catalog, planner, storage and API layers
//!
//! Enum wire names are snake_case. Meal types also accept the Spanish names
//! used by the supermarket catalog (`desayuno`, `almuerzo`, ...).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type UserId = u64;
pub type RecipeId = u64;

/// Meal slots of a day, in the order they are eaten
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    #[serde(alias = "desayuno")]
    Breakfast,
    #[serde(alias = "almuerzo")]
    MidMorning,
    #[serde(alias = "comida")]
    Lunch,
    #[serde(alias = "merienda")]
    AfternoonSnack,
    #[serde(alias = "cena")]
    Dinner,
}

impl MealType {
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::MidMorning,
        MealType::Lunch,
        MealType::AfternoonSnack,
        MealType::Dinner,
    ];

    /// First `meals_per_day` slots in day order, capped at five
    pub fn for_meals_per_day(meals_per_day: u8) -> &'static [MealType] {
        let n = usize::from(meals_per_day).min(Self::ALL.len());
        &Self::ALL[..n]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::MidMorning => "mid_morning",
            MealType::Lunch => "lunch",
            MealType::AfternoonSnack => "afternoon_snack",
            MealType::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "desayuno" => Ok(MealType::Breakfast),
            "mid_morning" | "almuerzo" => Ok(MealType::MidMorning),
            "lunch" | "comida" => Ok(MealType::Lunch),
            "afternoon_snack" | "merienda" => Ok(MealType::AfternoonSnack),
            "dinner" | "cena" => Ok(MealType::Dinner),
            other => Err(format!("unknown meal type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Physical activity level and its energy expenditure multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::VeryActive => 1.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Lose,
    Maintain,
    Gain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Supermarket {
    Mercadona,
    Lidl,
    #[serde(alias = "mixto")]
    Mixed,
}

impl Supermarket {
    pub const ALL: [Supermarket; 3] = [Supermarket::Mercadona, Supermarket::Lidl, Supermarket::Mixed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Supermarket::Mercadona => "mercadona",
            Supermarket::Lidl => "lidl",
            Supermarket::Mixed => "mixed",
        }
    }
}

/// Energy and macronutrients of one serving
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub calories: u32,
    pub protein: u32,
    pub carbs: u32,
    pub fat: u32,
}

impl std::ops::AddAssign for Macros {
    fn add_assign(&mut self, other: Self) {
        self.calories += other.calories;
        self.protein += other.protein;
        self.carbs += other.carbs;
        self.fat += other.fat;
    }
}

/// Catalog recipe. Ingredients are a comma separated list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub name: &'static str,
    pub meal_type: MealType,
    #[serde(flatten)]
    pub macros: Macros,
    pub ingredients: &'static str,
    pub instructions: &'static str,
    pub supermarket: Supermarket,
    pub category: &'static str,
}

impl Recipe {
    pub fn ingredient_list(&self) -> impl Iterator<Item = &'static str> {
        self.ingredients
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub password_salt: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: UserId,
    pub age: u32,
    pub gender: Gender,
    pub height_cm: f64,
    pub starting_weight_kg: f64,
    pub current_weight_kg: f64,
    pub goal_weight_kg: f64,
    pub activity_level: ActivityLevel,
    pub meals_per_day: u8,
    pub goal_type: GoalType,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub disliked_foods: String,
    pub target_calories: i64,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn meal_types(&self) -> &'static [MealType] {
        MealType::for_meals_per_day(self.meals_per_day)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub user_id: UserId,
    pub weight_kg: f64,
    pub week_number: u32,
    pub recorded_at: DateTime<Utc>,
}

/// A recipe in a user's rotating pool of options for one meal type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodBankEntry {
    pub id: u64,
    pub user_id: UserId,
    pub meal_type: MealType,
    pub recipe_id: RecipeId,
    pub times_used: u32,
    pub added_week: u32,
}

/// One slot of a weekly plan. Macros are copied from the recipe when the slot is filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanEntry {
    pub id: u64,
    pub user_id: UserId,
    pub week_number: u32,
    pub day_of_week: u8,
    pub meal_type: MealType,
    pub recipe_id: RecipeId,
    pub macros: Macros,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meal_types_for_meals_per_day() {
        assert_eq!(MealType::for_meals_per_day(0), &[] as &[MealType]);
        assert_eq!(
            MealType::for_meals_per_day(3),
            &[MealType::Breakfast, MealType::MidMorning, MealType::Lunch]
        );
        assert_eq!(MealType::for_meals_per_day(9).len(), 5);
    }

    #[test]
    fn test_meal_type_accepts_spanish_aliases() {
        let parsed: MealType = serde_json::from_str("\"cena\"").unwrap();
        assert_eq!(parsed, MealType::Dinner);
        assert_eq!("Merienda".parse::<MealType>().unwrap(), MealType::AfternoonSnack);
        assert_eq!(
            serde_json::to_string(&MealType::MidMorning).unwrap(),
            "\"mid_morning\""
        );
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.9);
    }

    #[test]
    fn test_macros_add_assign() {
        let mut total = Macros::default();
        total += Macros {
            calories: 100,
            protein: 10,
            carbs: 5,
            fat: 2,
        };
        total += Macros {
            calories: 50,
            protein: 1,
            carbs: 1,
            fat: 1,
        };
        assert_eq!(total.calories, 150);
        assert_eq!(total.fat, 3);
    }
}
