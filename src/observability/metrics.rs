//! Thread-safe metrics collection
//!
//! Atomic counters for domain events and mutex-protected per-route statistics
//! for request latency and failures.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Latency samples kept per route
const MAX_SAMPLES: usize = 1000;

/// Global metrics collector instance
pub static METRICS: Lazy<MetricsCollector> = Lazy::new(MetricsCollector::new);

/// Get reference to global metrics collector
pub fn metrics() -> &'static MetricsCollector {
    &METRICS
}

/// Domain events counted by the service layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietEvent {
    UserRegistered,
    LoginSucceeded,
    LoginFailed,
    ProfileSaved,
    PlanGenerated,
    MealSwapped,
    WeightCheckin,
    FoodBankExpanded,
    ShoppingListBuilt,
}

pub struct MetricsCollector {
    users_registered: AtomicU64,
    logins_succeeded: AtomicU64,
    logins_failed: AtomicU64,
    profiles_saved: AtomicU64,
    plans_generated: AtomicU64,
    meals_swapped: AtomicU64,
    weight_checkins: AtomicU64,
    food_bank_expansions: AtomicU64,
    shopping_lists_built: AtomicU64,

    route_stats: Mutex<BTreeMap<String, RouteStats>>,
    uptime_start: AtomicU64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            users_registered: AtomicU64::new(0),
            logins_succeeded: AtomicU64::new(0),
            logins_failed: AtomicU64::new(0),
            profiles_saved: AtomicU64::new(0),
            plans_generated: AtomicU64::new(0),
            meals_swapped: AtomicU64::new(0),
            weight_checkins: AtomicU64::new(0),
            food_bank_expansions: AtomicU64::new(0),
            shopping_lists_built: AtomicU64::new(0),
            route_stats: Mutex::new(BTreeMap::new()),
            uptime_start: AtomicU64::new(current_timestamp()),
        }
    }

    fn counter(&self, event: DietEvent) -> &AtomicU64 {
        match event {
            DietEvent::UserRegistered => &self.users_registered,
            DietEvent::LoginSucceeded => &self.logins_succeeded,
            DietEvent::LoginFailed => &self.logins_failed,
            DietEvent::ProfileSaved => &self.profiles_saved,
            DietEvent::PlanGenerated => &self.plans_generated,
            DietEvent::MealSwapped => &self.meals_swapped,
            DietEvent::WeightCheckin => &self.weight_checkins,
            DietEvent::FoodBankExpanded => &self.food_bank_expansions,
            DietEvent::ShoppingListBuilt => &self.shopping_lists_built,
        }
    }

    pub fn record(&self, event: DietEvent) {
        self.counter(event).fetch_add(1, Ordering::Relaxed);
    }

    /// Record one handled request. Server errors count as failures.
    pub fn request_completed(&self, route: &str, duration: Duration, status: u16) {
        if let Ok(mut stats) = self.route_stats.lock() {
            let route_stats = stats.entry(route.to_string()).or_default();
            route_stats.requests += 1;
            if status >= 500 {
                route_stats.server_errors += 1;
            } else if status >= 400 {
                route_stats.client_errors += 1;
            }

            route_stats.durations.push(duration.as_millis() as u64);
            if route_stats.durations.len() > MAX_SAMPLES {
                route_stats.durations.remove(0);
            }
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.users_registered,
            &self.logins_succeeded,
            &self.logins_failed,
            &self.profiles_saved,
            &self.plans_generated,
            &self.meals_swapped,
            &self.weight_checkins,
            &self.food_bank_expansions,
            &self.shopping_lists_built,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        if let Ok(mut stats) = self.route_stats.lock() {
            stats.clear();
        }
        self.uptime_start
            .store(current_timestamp(), Ordering::Relaxed);
    }

    fn route_snapshots(&self) -> BTreeMap<String, RouteStatsSnapshot> {
        let Ok(stats) = self.route_stats.lock() else {
            return BTreeMap::new();
        };

        stats
            .iter()
            .map(|(route, stats)| {
                let mut sorted = stats.durations.clone();
                sorted.sort_unstable();
                let avg = if sorted.is_empty() {
                    0.0
                } else {
                    sorted.iter().sum::<u64>() as f64 / sorted.len() as f64
                };

                let snapshot = RouteStatsSnapshot {
                    requests: stats.requests,
                    client_errors: stats.client_errors,
                    server_errors: stats.server_errors,
                    avg_duration_ms: avg,
                    p50_duration_ms: percentile(&sorted, 50.0),
                    p95_duration_ms: percentile(&sorted, 95.0),
                };
                (route.clone(), snapshot)
            })
            .collect()
    }

    pub fn uptime_seconds(&self) -> u64 {
        current_timestamp().saturating_sub(self.uptime_start.load(Ordering::Relaxed))
    }

    /// Get complete metrics snapshot
    pub fn get_metrics(&self) -> MetricsSnapshot {
        let routes = self.route_snapshots();
        let total_requests = routes.values().map(|r| r.requests).sum();
        let total_server_errors = routes.values().map(|r| r.server_errors).sum();

        MetricsSnapshot {
            events: EventMetrics {
                users_registered: self.users_registered.load(Ordering::Relaxed),
                logins_succeeded: self.logins_succeeded.load(Ordering::Relaxed),
                logins_failed: self.logins_failed.load(Ordering::Relaxed),
                profiles_saved: self.profiles_saved.load(Ordering::Relaxed),
                plans_generated: self.plans_generated.load(Ordering::Relaxed),
                meals_swapped: self.meals_swapped.load(Ordering::Relaxed),
                weight_checkins: self.weight_checkins.load(Ordering::Relaxed),
                food_bank_expansions: self.food_bank_expansions.load(Ordering::Relaxed),
                shopping_lists_built: self.shopping_lists_built.load(Ordering::Relaxed),
            },
            requests: RequestMetrics {
                total_requests,
                total_server_errors,
                routes,
            },
            uptime_seconds: self.uptime_seconds(),
            timestamp: current_timestamp(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
struct RouteStats {
    requests: u64,
    client_errors: u64,
    server_errors: u64,
    durations: Vec<u64>, // milliseconds
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub events: EventMetrics,
    pub requests: RequestMetrics,
    pub uptime_seconds: u64,
    pub timestamp: u64,
}

#[derive(Debug, Serialize)]
pub struct EventMetrics {
    pub users_registered: u64,
    pub logins_succeeded: u64,
    pub logins_failed: u64,
    pub profiles_saved: u64,
    pub plans_generated: u64,
    pub meals_swapped: u64,
    pub weight_checkins: u64,
    pub food_bank_expansions: u64,
    pub shopping_lists_built: u64,
}

#[derive(Debug, Serialize)]
pub struct RequestMetrics {
    pub total_requests: u64,
    pub total_server_errors: u64,
    pub routes: BTreeMap<String, RouteStatsSnapshot>,
}

#[derive(Debug, Serialize)]
pub struct RouteStatsSnapshot {
    pub requests: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub avg_duration_ms: f64,
    pub p50_duration_ms: f64,
    pub p95_duration_ms: f64,
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn percentile(sorted_data: &[u64], percentile: f64) -> f64 {
    if sorted_data.is_empty() {
        return 0.0;
    }

    let index = (percentile / 100.0) * (sorted_data.len() - 1) as f64;
    let lower = sorted_data[index.floor() as usize] as f64;
    let upper = sorted_data[index.ceil() as usize] as f64;

    lower + (upper - lower) * index.fract()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_event_counters() {
        let collector = MetricsCollector::new();

        collector.record(DietEvent::UserRegistered);
        collector.record(DietEvent::UserRegistered);
        collector.record(DietEvent::MealSwapped);

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.events.users_registered, 2);
        assert_eq!(snapshot.events.meals_swapped, 1);
        assert_eq!(snapshot.events.weight_checkins, 0);
    }

    #[test]
    fn test_route_stats() {
        let collector = MetricsCollector::new();

        collector.request_completed("POST /api/register", Duration::from_millis(10), 200);
        collector.request_completed("POST /api/register", Duration::from_millis(30), 409);
        collector.request_completed("GET /api/stats", Duration::from_millis(5), 500);

        let snapshot = collector.get_metrics();
        let register = &snapshot.requests.routes["POST /api/register"];
        assert_eq!(register.requests, 2);
        assert_eq!(register.client_errors, 1);
        assert_eq!(register.server_errors, 0);
        assert_eq!(register.avg_duration_ms, 20.0);
        assert_eq!(snapshot.requests.total_requests, 3);
        assert_eq!(snapshot.requests.total_server_errors, 1);
    }

    #[test]
    fn test_thread_safety() {
        let collector = Arc::new(MetricsCollector::new());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let collector = Arc::clone(&collector);
                thread::spawn(move || {
                    for _ in 0..100 {
                        collector.record(DietEvent::PlanGenerated);
                        collector.request_completed("GET /api/health", Duration::ZERO, 200);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.events.plans_generated, 1000);
        assert_eq!(snapshot.requests.routes["GET /api/health"].requests, 1000);
    }

    #[test]
    fn test_percentile_calculation() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

        assert!((percentile(&data, 50.0) - 5.5).abs() < 0.1);
        assert!((percentile(&data, 95.0) - 9.55).abs() < 0.1);
        assert_eq!(percentile(&data, 0.0), 1.0);
        assert_eq!(percentile(&data, 100.0), 10.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_samples_are_bounded() {
        let collector = MetricsCollector::new();
        for i in 0..1500 {
            collector.request_completed("GET /api/recipes", Duration::from_millis(i), 200);
        }

        let stats = collector.route_stats.lock().unwrap();
        assert_eq!(stats["GET /api/recipes"].durations.len(), MAX_SAMPLES);
        assert_eq!(stats["GET /api/recipes"].requests, 1500);
    }

    #[test]
    fn test_reset() {
        let collector = MetricsCollector::new();
        collector.record(DietEvent::WeightCheckin);
        collector.request_completed("GET /api/stats", Duration::ZERO, 200);

        collector.reset();

        let snapshot = collector.get_metrics();
        assert_eq!(snapshot.events.weight_checkins, 0);
        assert!(snapshot.requests.routes.is_empty());
    }
}
