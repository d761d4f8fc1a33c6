//! dietplan - diet planning backend
//!
//! Computes calorie targets from a body profile, keeps a rotating per-user
//! "food bank" of recipes for every meal of the day, and draws weekly meal plans
//! from it. Users can swap meals, check in their weight (which unlocks new
//! recipes and recomputes the target), and get a shopping list grouped by
//! supermarket.
//!
//! # Overview
//!
//! - [`catalog`]: the fixed recipe catalog
//! - [`nutrition`]: basal metabolic rate, energy expenditure and calorie targets
//! - [`planner`]: food bank rotation and weekly plan generation
//! - [`storage`]: the [`Store`] trait and its in-memory/JSON snapshot implementation
//! - [`service`]: one async operation per API endpoint
//! - [`api`]: warp routes under `/api`
//!
//! # Quick Start
//!
//! ```rust
//! use dietplan::models::{ActivityLevel, Gender, GoalType};
//! use dietplan::nutrition::{BodyMetrics, CalorieTargets};
//!
//! let body = BodyMetrics {
//!     age: 30,
//!     gender: Gender::Male,
//!     height_cm: 180.0,
//!     weight_kg: 85.0,
//!     activity_level: ActivityLevel::Active,
//! };
//! let targets = CalorieTargets::compute(&body, GoalType::Lose, 75.0);
//!
//! assert_eq!(targets.bmr, 1830);
//! assert_eq!(targets.tdee, 3157);
//! assert_eq!(targets.target_calories, 2657);
//! ```

pub mod api;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod nutrition;
pub mod observability;
pub mod planner;
pub mod service;
pub mod shopping;
pub mod storage;
pub mod testing;

pub use clock::{SystemClock, WeekClock};
pub use config::{ConfigError, DietConfig};
pub use error::{DietError, DietResult, ErrorBody};
pub use service::DietService;
pub use storage::{MemoryStore, Store};
