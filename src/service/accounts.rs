//! Registration, login and body profile

use super::DietService;
use crate::error::{DietError, DietResult};
use crate::models::{ActivityLevel, Gender, GoalType, Profile, UserId, WeightEntry};
use crate::nutrition::{BodyMetrics, CalorieTargets};
use crate::observability::{metrics, DietEvent};
use crate::storage::{NewUser, Store};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::ops::RangeInclusive;

const SALT_BYTES: usize = 16;

const AGE_RANGE: RangeInclusive<u32> = 1..=120;
const HEIGHT_RANGE_CM: RangeInclusive<f64> = 50.0..=260.0;
pub(crate) const WEIGHT_RANGE_KG: RangeInclusive<f64> = 20.0..=400.0;
const MEALS_PER_DAY_RANGE: RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterResponse {
    pub success: bool,
    pub user_id: UserId,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginResponse {
    pub success: bool,
    pub user_id: UserId,
    pub name: String,
}

/// Body profile as submitted by the client. Weights are in kg, height in cm.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub user_id: Option<UserId>,
    pub age: u32,
    pub gender: Gender,
    #[serde(alias = "height_cm")]
    pub height: f64,
    #[serde(alias = "current_weight_kg")]
    pub current_weight: f64,
    #[serde(alias = "goal_weight_kg")]
    pub goal_weight: f64,
    pub activity_level: ActivityLevel,
    pub meals_per_day: u8,
    pub goal_type: GoalType,
    #[serde(default)]
    pub allergies: String,
    #[serde(default)]
    pub disliked_foods: String,
}

impl ProfileRequest {
    fn validate(&self) -> DietResult<UserId> {
        let user_id = self
            .user_id
            .ok_or_else(|| DietError::invalid_input("user_id is required"))?;

        if !AGE_RANGE.contains(&self.age) {
            return Err(DietError::invalid_input(format!(
                "age must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            )));
        }
        if !HEIGHT_RANGE_CM.contains(&self.height) {
            return Err(DietError::invalid_input(format!(
                "height must be between {} and {} cm",
                HEIGHT_RANGE_CM.start(),
                HEIGHT_RANGE_CM.end()
            )));
        }
        for (field, value) in [
            ("current_weight", self.current_weight),
            ("goal_weight", self.goal_weight),
        ] {
            if !WEIGHT_RANGE_KG.contains(&value) {
                return Err(DietError::invalid_input(format!(
                    "{field} must be between {} and {} kg",
                    WEIGHT_RANGE_KG.start(),
                    WEIGHT_RANGE_KG.end()
                )));
            }
        }
        if !MEALS_PER_DAY_RANGE.contains(&self.meals_per_day) {
            return Err(DietError::invalid_input("meals_per_day must be between 1 and 5"));
        }

        Ok(user_id)
    }

    fn body_metrics(&self) -> BodyMetrics {
        BodyMetrics {
            age: self.age,
            gender: self.gender,
            height_cm: self.height,
            weight_kg: self.current_weight,
            activity_level: self.activity_level,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileResponse {
    pub success: bool,
    pub bmr: i64,
    pub tdee: i64,
    pub target_calories: i64,
    /// Whether a food bank and first week were created by this call
    pub plan_created: bool,
}

/// Hex encoded SHA-256 of `salt || password`
pub fn hash_password(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl<S: Store> DietService<S> {
    pub async fn register(&self, request: RegisterRequest) -> DietResult<RegisterResponse> {
        let email = normalize_email(&request.email);
        let name = request.name.trim();

        if email.is_empty() || request.password.is_empty() || name.is_empty() {
            return Err(DietError::invalid_input(
                "email, password and name are required",
            ));
        }
        if !email.contains('@') {
            return Err(DietError::invalid_input("email is not valid"));
        }

        let salt = generate_salt();
        let user = self
            .store
            .create_user(NewUser {
                password_hash: hash_password(&salt, &request.password),
                password_salt: salt,
                email,
                name: name.to_string(),
                created_at: self.clock.now(),
            })
            .await?;

        metrics().record(DietEvent::UserRegistered);
        tracing::info!(user_id = user.id, "Registered user");

        Ok(RegisterResponse {
            success: true,
            user_id: user.id,
        })
    }

    pub async fn login(&self, request: LoginRequest) -> DietResult<LoginResponse> {
        let email = normalize_email(&request.email);
        let user = self.store.find_user_by_email(&email).await?;

        match user {
            Some(user) if hash_password(&user.password_salt, &request.password) == user.password_hash => {
                metrics().record(DietEvent::LoginSucceeded);
                tracing::debug!(user_id = user.id, "Login succeeded");
                Ok(LoginResponse {
                    success: true,
                    user_id: user.id,
                    name: user.name,
                })
            }
            _ => {
                metrics().record(DietEvent::LoginFailed);
                tracing::warn!("Login rejected");
                Err(DietError::InvalidCredentials)
            }
        }
    }

    /// Store the profile, log the weight, and compute calorie targets. A user
    /// without a food bank gets one seeded, plus a first week drawn from it.
    pub async fn save_profile(&self, request: ProfileRequest) -> DietResult<ProfileResponse> {
        let user_id = request.validate()?;
        self.require_user(user_id).await?;

        let targets = CalorieTargets::compute(
            &request.body_metrics(),
            request.goal_type,
            request.goal_weight,
        );
        let now = self.clock.now();
        let week = self.current_week();

        let starting_weight_kg = match self.store.get_profile(user_id).await? {
            Some(existing) => existing.starting_weight_kg,
            None => request.current_weight,
        };

        let profile = Profile {
            user_id,
            age: request.age,
            gender: request.gender,
            height_cm: request.height,
            starting_weight_kg,
            current_weight_kg: request.current_weight,
            goal_weight_kg: request.goal_weight,
            activity_level: request.activity_level,
            meals_per_day: request.meals_per_day,
            goal_type: request.goal_type,
            allergies: request.allergies,
            disliked_foods: request.disliked_foods,
            target_calories: targets.target_calories,
            updated_at: now,
        };
        self.store.upsert_profile(profile.clone()).await?;

        self.store
            .add_weight(WeightEntry {
                user_id,
                weight_kg: request.current_weight,
                week_number: week,
                recorded_at: now,
            })
            .await?;

        let bank = self.store.food_bank(user_id, None).await?;
        let plan_created = bank.is_empty();
        if plan_created {
            self.seed_missing_meal_types(user_id, profile.meal_types(), &bank)
                .await?;
            self.regenerate_week(&profile).await?;
            metrics().record(DietEvent::PlanGenerated);
        }

        metrics().record(DietEvent::ProfileSaved);
        tracing::info!(
            user_id,
            target_calories = targets.target_calories,
            plan_created,
            "Saved profile"
        );

        Ok(ProfileResponse {
            success: true,
            bmr: targets.bmr,
            tdee: targets.tdee,
            target_calories: targets.target_calories,
            plan_created,
        })
    }
}
