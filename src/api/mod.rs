//! HTTP surface
//!
//! JSON routes under `/api`, with CORS open to any origin. Rejections from
//! warp itself (unknown route, malformed body or query) are recovered into the
//! same `{"error": "..."}` shape the handlers produce.

pub mod handlers;
pub mod rejection;

use crate::error::{DietError, DietResult};
use crate::service::{
    CheckinRequest, DietService, LoginRequest, ProfileRequest, RegisterRequest, SwapRequest,
};
use crate::storage::Store;
use serde::de::DeserializeOwned;
use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};

const MAX_BODY_BYTES: u64 = 64 * 1024;

fn with_service<S: Store + 'static>(
    service: Arc<DietService<S>>,
) -> impl Filter<Extract = (Arc<DietService<S>>,), Error = Infallible> + Clone {
    warp::any().map(move || service.clone())
}

fn json_body<T: DeserializeOwned + Send>() -> impl Filter<Extract = (T,), Error = Rejection> + Clone
{
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}

/// Every `/api` route, recovered and wrapped in CORS
pub fn routes<S: Store + 'static>(
    service: Arc<DietService<S>>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let health = warp::path!("api" / "health")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and_then(handlers::health::<S>);

    let metrics = warp::path!("api" / "metrics")
        .and(warp::get())
        .and_then(handlers::metrics_snapshot);

    let recipes = warp::path!("api" / "recipes")
        .and(warp::get())
        .and(warp::query::<handlers::UserQuery>())
        .and_then(handlers::recipes);

    let register = warp::path!("api" / "register")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<RegisterRequest>())
        .and_then(handlers::register::<S>);

    let login = warp::path!("api" / "login")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<LoginRequest>())
        .and_then(handlers::login::<S>);

    let profile = warp::path!("api" / "profile")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<ProfileRequest>())
        .and_then(handlers::save_profile::<S>);

    let current_plan = warp::path!("api" / "plan" / "current")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and(warp::query::<handlers::UserQuery>())
        .and_then(handlers::current_plan::<S>);

    let generate_plan = warp::path!("api" / "plan" / "generate")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<handlers::UserBody>())
        .and_then(handlers::generate_plan::<S>);

    let swap = warp::path!("api" / "plan" / "swap")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<SwapRequest>())
        .and_then(handlers::swap_meal::<S>);

    let food_bank = warp::path!("api" / "food-bank" / "options")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and(warp::query::<handlers::UserQuery>())
        .and_then(handlers::food_bank_options::<S>);

    let checkin = warp::path!("api" / "weight" / "checkin")
        .and(warp::post())
        .and(with_service(service.clone()))
        .and(json_body::<CheckinRequest>())
        .and_then(handlers::weight_checkin::<S>);

    let shopping_list = warp::path!("api" / "shopping-list")
        .and(warp::get())
        .and(with_service(service.clone()))
        .and(warp::query::<handlers::UserQuery>())
        .and_then(handlers::shopping_list::<S>);

    let stats = warp::path!("api" / "stats")
        .and(warp::get())
        .and(with_service(service))
        .and(warp::query::<handlers::UserQuery>())
        .and_then(handlers::stats::<S>);

    let accounts = register.or(login).or(profile);
    let plans = current_plan
        .or(generate_plan)
        .or(swap)
        .or(food_bank)
        .or(shopping_list);
    let progress = checkin.or(stats);

    health
        .or(metrics)
        .or(recipes)
        .or(accounts)
        .or(plans)
        .or(progress)
        .recover(rejection::handle_rejection)
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_methods(vec!["GET", "POST", "OPTIONS"])
                .allow_headers(vec!["content-type"]),
        )
}

/// Serve the API on `addr` until `shutdown` resolves
pub async fn serve<S, F>(service: Arc<DietService<S>>, addr: SocketAddr, shutdown: F) -> DietResult<()>
where
    S: Store + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    let (bound, server) = warp::serve(routes(service))
        .try_bind_with_graceful_shutdown(addr, shutdown)
        .map_err(|e| DietError::internal_error(format!("failed to bind {addr}: {e}")))?;

    tracing::info!("Listening on http://{bound}");
    server.await;
    tracing::info!("Server stopped");

    Ok(())
}
