//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::kernel::ServerKernel;
use crate::server::routes::{
    app_notification_handler, chair_activity_handler, chair_coordinate_handler,
    chair_notification_handler, chair_ride_status_handler, create_ride_handler,
    evaluate_ride_handler, health_handler, list_owner_chairs_handler, list_rides_handler,
    matching_handler, register_chair_handler, register_owner_handler,
    register_payment_method_handler, register_user_handler, ride_status_handler,
};

/// Build the Axum application router
pub fn build_app(kernel: Arc<ServerKernel>) -> Router {
    Router::new()
        // Requesters
        .route("/api/app/users", post(register_user_handler))
        .route(
            "/api/app/users/:user_id/payment-methods",
            post(register_payment_method_handler),
        )
        .route("/api/app/users/:user_id/rides", get(list_rides_handler))
        .route("/api/app/rides", post(create_ride_handler))
        .route(
            "/api/app/rides/:ride_id/evaluation",
            post(evaluate_ride_handler),
        )
        .route(
            "/api/app/rides/:ride_id/notification",
            get(app_notification_handler),
        )
        // Owners and chairs
        .route("/api/owner/owners", post(register_owner_handler))
        .route(
            "/api/owner/owners/:owner_id/chairs",
            get(list_owner_chairs_handler).post(register_chair_handler),
        )
        .route(
            "/api/chair/chairs/:chair_id/activity",
            post(chair_activity_handler),
        )
        .route(
            "/api/chair/chairs/:chair_id/coordinate",
            post(chair_coordinate_handler),
        )
        .route(
            "/api/chair/chairs/:chair_id/rides/:ride_id/status",
            post(chair_ride_status_handler),
        )
        .route(
            "/api/chair/rides/:ride_id/notification",
            get(chair_notification_handler),
        )
        // Shared
        .route("/api/rides/:ride_id/status", get(ride_status_handler))
        .route("/api/internal/matching", get(matching_handler))
        .route("/health", get(health_handler))
        .layer(Extension(kernel))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http())
}
