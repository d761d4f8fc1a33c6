//! End-to-end behavior of the service operations against the mock store


use chrono::{TimeZone, Utc};
use dietplan::catalog;
use dietplan::models::{MealType, Supermarket};
use dietplan::service::{CheckinRequest, LoginRequest, SwapRequest};
use dietplan::storage::Store;
use dietplan::testing::MockStore;
use dietplan::{DietError, MemoryStore};
use std::sync::Arc;
use test_helpers::{onboard, profile_request, register_request, test_env};

#[tokio::test]
async fn test_register_and_login() {
    let env = test_env();

    let registered = env
        .service
        .register(register_request("Lucia@Example.com "))
        .await
        .unwrap();
    assert!(registered.success);

    let login = env
        .service
        .login(LoginRequest {
            email: "lucia@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(login.user_id, registered.user_id);
    assert_eq!(login.name, "Lucía");

    let user = env.store.get_user(registered.user_id).await.unwrap().unwrap();
    assert_ne!(user.password_hash, "correct horse");
    assert_eq!(user.email, "lucia@example.com");
}

#[tokio::test]
async fn test_register_rejects_duplicates_and_blank_fields() {
    let env = test_env();
    env.service
        .register(register_request("ana@example.com"))
        .await
        .unwrap();

    let duplicate = env
        .service
        .register(register_request("ANA@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(duplicate, DietError::Conflict { .. }));
    assert_eq!(duplicate.status_code().as_u16(), 409);

    let mut blank = register_request("other@example.com");
    blank.name = "   ".to_string();
    let err = env.service.register(blank).await.unwrap_err();
    assert_eq!(err.status_code().as_u16(), 400);
}

#[tokio::test]
async fn test_login_rejects_bad_credentials() {
    let env = test_env();
    env.service
        .register(register_request("ana@example.com"))
        .await
        .unwrap();

    for (email, password) in [
        ("ana@example.com", "wrong"),
        ("nobody@example.com", "correct horse"),
    ] {
        let err = env
            .service
            .login(LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DietError::InvalidCredentials));
        assert_eq!(err.status_code().as_u16(), 401);
    }
}

#[tokio::test]
async fn test_save_profile_seeds_bank_and_first_week() {
    let env = test_env();
    let user_id = env
        .service
        .register(register_request("ana@example.com"))
        .await
        .unwrap()
        .user_id;

    let response = env
        .service
        .save_profile(profile_request(user_id, 3))
        .await
        .unwrap();
    assert_eq!(response.bmr, 1420);
    assert_eq!(response.tdee, 2201);
    assert_eq!(response.target_calories, 1741);
    assert!(response.plan_created);

    let bank = env.store.food_bank(user_id, None).await.unwrap();
    assert_eq!(bank.len(), 3);
    assert_eq!(
        bank.iter().map(|e| e.meal_type).collect::<Vec<_>>(),
        vec![MealType::Breakfast, MealType::MidMorning, MealType::Lunch]
    );

    let plan = env.service.current_plan(user_id).await.unwrap();
    assert_eq!(plan.week, 10);
    assert_eq!(plan.meals.len(), 21);
    assert_eq!(plan.daily_totals.len(), 7);
    for meal in &plan.meals {
        let bank_entry = bank.iter().find(|e| e.meal_type == meal.meal_type).unwrap();
        assert_eq!(meal.recipe_id, bank_entry.recipe_id);
    }

    let history = env.store.weight_history(user_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].week_number, 10);
}

#[tokio::test]
async fn test_save_profile_requires_existing_user() {
    let env = test_env();

    let err = env
        .service
        .save_profile(profile_request(99, 3))
        .await
        .unwrap_err();
    assert!(matches!(err, DietError::NotFound { .. }));
}

#[tokio::test]
async fn test_resaving_profile_keeps_bank_and_starting_weight() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;
    let bank_before = env.store.food_bank(user_id, None).await.unwrap();

    let mut request = profile_request(user_id, 3);
    request.current_weight = 69.0;
    let response = env.service.save_profile(request).await.unwrap();

    assert!(!response.plan_created);
    assert_eq!(env.store.food_bank(user_id, None).await.unwrap(), bank_before);

    let stats = env.service.stats(user_id).await.unwrap();
    assert_eq!(stats.starting_weight, 70.0);
    assert_eq!(stats.current_weight, 69.0);
}

#[tokio::test]
async fn test_weight_checkin_expands_bank_and_recomputes_target() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 5).await;

    let response = env
        .service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 68.0,
        })
        .await
        .unwrap();

    // 10*68 + 6.25*165 - 5*30 - 161 = 1400.25; x1.55 = 2170; deficit 300 + 6*20
    assert_eq!(response.new_target_calories, 1750);
    assert_eq!(response.added_recipes.len(), 5);

    let bank = env.store.food_bank(user_id, None).await.unwrap();
    assert_eq!(bank.len(), 10);
    for meal_type in MealType::ALL {
        let recipes: Vec<_> = bank
            .iter()
            .filter(|e| e.meal_type == meal_type)
            .map(|e| e.recipe_id)
            .collect();
        assert_eq!(recipes.len(), 2);
        assert_ne!(recipes[0], recipes[1]);
    }

    let profile = env.store.get_profile(user_id).await.unwrap().unwrap();
    assert_eq!(profile.current_weight_kg, 68.0);
    assert_eq!(profile.target_calories, 1750);
}

#[tokio::test]
async fn test_food_bank_is_bounded_by_catalog_size() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 2).await;

    for _ in 0..5 {
        env.service
            .weight_checkin(CheckinRequest {
                user_id,
                weight: 69.0,
            })
            .await
            .unwrap();
    }
    let full = env
        .service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 69.0,
        })
        .await
        .unwrap();
    assert!(full.added_recipes.is_empty());

    let options = env
        .service
        .food_bank_options(user_id, Some(MealType::Breakfast))
        .await
        .unwrap();
    assert_eq!(options.options.len(), catalog::RECIPES_PER_MEAL_TYPE);
    assert!(options
        .options
        .iter()
        .all(|o| o.meal_type == MealType::Breakfast));
}

#[tokio::test]
async fn test_weight_checkin_requires_profile() {
    let env = test_env();
    let user_id = env
        .service
        .register(register_request("ana@example.com"))
        .await
        .unwrap()
        .user_id;

    let err = env
        .service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 70.0,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DietError::NotFound { .. }));
    assert!(env.store.weight_history(user_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_plan_draws_from_bank() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 4).await;
    for _ in 0..3 {
        env.service
            .weight_checkin(CheckinRequest {
                user_id,
                weight: 69.5,
            })
            .await
            .unwrap();
    }

    let plan = env.service.generate_plan(user_id).await.unwrap();
    let bank = env.store.food_bank(user_id, None).await.unwrap();

    assert_eq!(plan.meals.len(), 28);
    for meal in &plan.meals {
        assert!(bank
            .iter()
            .any(|e| e.meal_type == meal.meal_type && e.recipe_id == meal.recipe_id));
    }
}

#[tokio::test]
async fn test_swap_meal_updates_slot_and_usage() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;
    env.service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 69.0,
        })
        .await
        .unwrap();

    let lunch_options = env
        .service
        .food_bank_options(user_id, Some(MealType::Lunch))
        .await
        .unwrap()
        .options;
    let plan = env.service.current_plan(user_id).await.unwrap();
    let current = plan
        .meals
        .iter()
        .find(|m| m.day_of_week == 3 && m.meal_type == MealType::Lunch)
        .unwrap();
    let replacement = lunch_options
        .iter()
        .find(|o| o.recipe_id != current.recipe_id)
        .unwrap();

    let swapped = env
        .service
        .swap_meal(SwapRequest {
            user_id,
            day: 3,
            meal_type: MealType::Lunch,
            new_recipe_id: replacement.recipe_id,
        })
        .await
        .unwrap();
    assert_eq!(swapped.meal.recipe_id, replacement.recipe_id);
    assert_eq!(swapped.meal.macros, catalog::get(replacement.recipe_id).unwrap().macros);

    let plan = env.service.current_plan(user_id).await.unwrap();
    let day_three_lunch = plan
        .meals
        .iter()
        .find(|m| m.day_of_week == 3 && m.meal_type == MealType::Lunch)
        .unwrap();
    assert_eq!(day_three_lunch.recipe_id, replacement.recipe_id);

    let options = env
        .service
        .food_bank_options(user_id, Some(MealType::Lunch))
        .await
        .unwrap()
        .options;
    let used = options
        .iter()
        .find(|o| o.recipe_id == replacement.recipe_id)
        .unwrap();
    assert_eq!(used.times_used, 1);
}

#[tokio::test]
async fn test_swap_meal_validation() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;

    let swap = |day, meal_type, new_recipe_id| SwapRequest {
        user_id,
        day,
        meal_type,
        new_recipe_id,
    };

    let unknown = env.service.swap_meal(swap(1, MealType::Lunch, 999)).await;
    assert_eq!(unknown.unwrap_err().status_code().as_u16(), 404);

    // recipe 1 is a breakfast
    let mismatch = env.service.swap_meal(swap(1, MealType::Lunch, 1)).await;
    assert_eq!(mismatch.unwrap_err().status_code().as_u16(), 400);

    let bad_day = env.service.swap_meal(swap(8, MealType::Lunch, 13)).await;
    assert_eq!(bad_day.unwrap_err().status_code().as_u16(), 400);

    // dinner is not part of a three meal plan
    let no_slot = env.service.swap_meal(swap(1, MealType::Dinner, 25)).await;
    assert!(matches!(no_slot.unwrap_err(), DietError::NotFound { .. }));
}

#[tokio::test]
async fn test_new_week_starts_without_plan() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;

    env.clock.set_week(11);
    let plan = env.service.current_plan(user_id).await.unwrap();
    assert_eq!(plan.week, 11);
    assert!(plan.meals.is_empty());

    let plan = env.service.generate_plan(user_id).await.unwrap();
    assert_eq!(plan.meals.len(), 21);
}

#[tokio::test]
async fn test_shopping_list_groups_plan_ingredients() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 5).await;

    let response = env.service.shopping_list(user_id).await.unwrap();
    assert_eq!(response.week, 10);

    let plan = env.service.current_plan(user_id).await.unwrap();
    for meal in &plan.meals {
        let recipe = catalog::get(meal.recipe_id).unwrap();
        let items = response.shopping_list.items(recipe.supermarket);
        for ingredient in recipe.ingredient_list() {
            assert!(items.iter().any(|item| item == ingredient));
        }
    }

    let json = serde_json::to_value(&response).unwrap();
    for key in ["mercadona", "lidl", "mixed"] {
        assert!(json["shopping_list"][key].is_array(), "missing {key}");
    }
    assert!(!response.shopping_list.items(Supermarket::Mixed).is_empty());
}

#[tokio::test]
async fn test_stats_progress() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;

    let stats = env.service.stats(user_id).await.unwrap();
    assert_eq!(stats.current_weight, 70.0);
    assert_eq!(stats.goal_weight, 62.0);
    assert_eq!(stats.progress_percent, 0.0);

    env.service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 68.0,
        })
        .await
        .unwrap();

    let stats = env.service.stats(user_id).await.unwrap();
    assert_eq!(stats.weight_history.len(), 2);
    assert_eq!(stats.current_weight, 68.0);
    assert_eq!(stats.progress_percent, 25.0);
}

#[tokio::test]
async fn test_stats_use_latest_checkin_across_new_year() {
    let env = test_env();
    env.clock
        .set_time(Utc.with_ymd_and_hms(2024, 12, 23, 9, 0, 0).unwrap(), 52);
    let user_id = onboard(&env, "ana@example.com", 3).await;

    env.clock
        .set_time(Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap(), 2);
    env.service
        .weight_checkin(CheckinRequest {
            user_id,
            weight: 66.0,
        })
        .await
        .unwrap();

    let stats = env.service.stats(user_id).await.unwrap();
    assert_eq!(stats.current_weight, 66.0);
    assert_eq!(stats.progress_percent, 50.0);
    assert_eq!(stats.weight_history.last().unwrap().week_number, 2);
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let env = test_env();
    let user_id = onboard(&env, "ana@example.com", 3).await;

    env.store.set_failing(true);
    let err = env.service.stats(user_id).await.unwrap_err();

    assert_eq!(err.status_code().as_u16(), 500);
    let body = err.to_error_body();
    assert!(!body.error.contains("hunter2"));

    let health = env.service.health().await;
    assert!(!health.is_healthy());
    assert_eq!(health.checks["storage"].status, "unhealthy");
}

#[tokio::test]
async fn test_health_reports_healthy_store() {
    let env = test_env();
    let health = env.service.health().await;

    assert!(health.is_healthy());
    assert_eq!(health.status, "healthy");
    assert!(env.store.calls().contains(&"ping"));
}

#[tokio::test]
async fn test_failing_store_from_start() {
    let store = Arc::new(MockStore::with_failure());
    let service = dietplan::DietService::new(
        store,
        Arc::new(dietplan::testing::FixedClock::default()),
        &Default::default(),
    );

    let err = service
        .register(register_request("ana@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, DietError::StorageError { .. }));
}

#[tokio::test]
async fn test_snapshot_store_keeps_users_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("dietplan.json");

    let user_id = {
        let store = Arc::new(MemoryStore::open(&path).await.unwrap());
        let service = dietplan::DietService::new(
            store,
            Arc::new(dietplan::testing::FixedClock::default()),
            &Default::default(),
        );
        let user_id = service
            .register(register_request("ana@example.com"))
            .await
            .unwrap()
            .user_id;
        service
            .save_profile(profile_request(user_id, 3))
            .await
            .unwrap();
        user_id
    };

    let reopened = MemoryStore::open(&path).await.unwrap();
    assert!(reopened.get_profile(user_id).await.unwrap().is_some());
    assert_eq!(reopened.week_plan(user_id, 10).await.unwrap().len(), 21);
    assert!(reopened
        .find_user_by_email("ana@example.com")
        .await
        .unwrap()
        .is_some());
}
