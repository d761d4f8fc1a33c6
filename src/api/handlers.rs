//! Request handlers
//!
//! Each handler runs one service operation inside a request span, records the
//! outcome in the metrics collector, and renders either the result or an
//! [`ErrorBody`](crate::error::ErrorBody) with the matching status code.

use crate::catalog;
use crate::error::{DietError, DietResult};
use crate::models::{MealType, Recipe, UserId};
use crate::observability::metrics;
use crate::request_span;
use crate::service::{
    CheckinRequest, DietService, LoginRequest, ProfileRequest, RegisterRequest, SwapRequest,
};
use crate::storage::Store;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::Reply;

/// Query string shared by the read endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<UserId>,
    pub meal_type: Option<MealType>,
}

impl UserQuery {
    fn user_id(&self) -> DietResult<UserId> {
        self.user_id
            .ok_or_else(|| DietError::invalid_input("user_id is required"))
    }
}

/// Body of endpoints that only need a user
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserBody {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Serialize)]
struct RecipeList {
    recipes: Vec<&'static Recipe>,
}

/// Run `operation` under a request span and render its outcome
async fn respond<T, F>(route: &'static str, operation: F) -> Result<Response, Infallible>
where
    T: Serialize,
    F: Future<Output = DietResult<T>>,
{
    let started = Instant::now();
    let result = operation
        .instrument(request_span!(route = route))
        .await;

    let (status, reply) = match result {
        Ok(body) => (StatusCode::OK, warp::reply::json(&body)),
        Err(e) => {
            let status = e.status_code();
            if status.is_server_error() {
                tracing::error!(route, error = %e, "Request failed");
            } else {
                tracing::debug!(route, error = %e, "Request refused");
            }
            (status, warp::reply::json(&e.to_error_body()))
        }
    };

    metrics().request_completed(route, started.elapsed(), status.as_u16());
    Ok(warp::reply::with_status(reply, status).into_response())
}

pub async fn health<S: Store>(service: Arc<DietService<S>>) -> Result<Response, Infallible> {
    let started = Instant::now();
    let status = service
        .health()
        .instrument(request_span!(route = "GET /api/health"))
        .await;

    let code = if status.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    metrics().request_completed("GET /api/health", started.elapsed(), code.as_u16());

    Ok(warp::reply::with_status(warp::reply::json(&status), code).into_response())
}

pub async fn metrics_snapshot() -> Result<Response, Infallible> {
    Ok(warp::reply::json(&metrics().get_metrics()).into_response())
}

pub async fn recipes(query: UserQuery) -> Result<Response, Infallible> {
    respond("GET /api/recipes", async move {
        let recipes = match query.meal_type {
            Some(meal_type) => catalog::by_meal_type(meal_type).collect(),
            None => catalog::all().iter().collect(),
        };
        Ok(RecipeList { recipes })
    })
    .await
}

pub async fn register<S: Store>(
    service: Arc<DietService<S>>,
    request: RegisterRequest,
) -> Result<Response, Infallible> {
    respond("POST /api/register", service.register(request)).await
}

pub async fn login<S: Store>(
    service: Arc<DietService<S>>,
    request: LoginRequest,
) -> Result<Response, Infallible> {
    respond("POST /api/login", service.login(request)).await
}

pub async fn save_profile<S: Store>(
    service: Arc<DietService<S>>,
    request: ProfileRequest,
) -> Result<Response, Infallible> {
    respond("POST /api/profile", service.save_profile(request)).await
}

pub async fn current_plan<S: Store>(
    service: Arc<DietService<S>>,
    query: UserQuery,
) -> Result<Response, Infallible> {
    respond("GET /api/plan/current", async move {
        service.current_plan(query.user_id()?).await
    })
    .await
}

pub async fn generate_plan<S: Store>(
    service: Arc<DietService<S>>,
    body: UserBody,
) -> Result<Response, Infallible> {
    respond("POST /api/plan/generate", async move {
        let user_id = body
            .user_id
            .ok_or_else(|| DietError::invalid_input("user_id is required"))?;
        service.generate_plan(user_id).await
    })
    .await
}

pub async fn food_bank_options<S: Store>(
    service: Arc<DietService<S>>,
    query: UserQuery,
) -> Result<Response, Infallible> {
    respond("GET /api/food-bank/options", async move {
        service
            .food_bank_options(query.user_id()?, query.meal_type)
            .await
    })
    .await
}

pub async fn swap_meal<S: Store>(
    service: Arc<DietService<S>>,
    request: SwapRequest,
) -> Result<Response, Infallible> {
    respond("POST /api/plan/swap", service.swap_meal(request)).await
}

pub async fn weight_checkin<S: Store>(
    service: Arc<DietService<S>>,
    request: CheckinRequest,
) -> Result<Response, Infallible> {
    respond("POST /api/weight/checkin", service.weight_checkin(request)).await
}

pub async fn shopping_list<S: Store>(
    service: Arc<DietService<S>>,
    query: UserQuery,
) -> Result<Response, Infallible> {
    respond("GET /api/shopping-list", async move {
        service.shopping_list(query.user_id()?).await
    })
    .await
}

pub async fn stats<S: Store>(
    service: Arc<DietService<S>>,
    query: UserQuery,
) -> Result<Response, Infallible> {
    respond("GET /api/stats", async move {
        service.stats(query.user_id()?).await
    })
    .await
}
