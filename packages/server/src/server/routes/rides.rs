//! Requester-facing ride routes.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::common::{Coordinate, RideId, UserId};
use crate::domains::accounts::User;
use crate::domains::ride_status::RideStatusLabel;
use crate::domains::rides::actions::{
    create_ride, evaluate_ride, list_rides, register_payment_token, EvaluatedRide,
};
use crate::domains::rides::Ride;
use crate::kernel::ServerKernel;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub id: UserId,
}

pub async fn register_user_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Json(body): Json<RegisterUserRequest>,
) -> ApiResult<(StatusCode, Json<RegisterUserResponse>)> {
    if body.username.trim().is_empty() {
        return Err(ApiError::BadRequest("username is required".to_string()));
    }
    let user = User::create(body.username.trim(), &kernel.db_pool).await?;
    Ok((StatusCode::CREATED, Json(RegisterUserResponse { id: user.id })))
}

#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub token: String,
}

pub async fn register_payment_method_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(user_id): Path<UserId>,
    Json(body): Json<PaymentMethodRequest>,
) -> ApiResult<StatusCode> {
    if body.token.is_empty() {
        return Err(ApiError::BadRequest("token is required".to_string()));
    }
    register_payment_token(user_id, &body.token, &kernel).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct CreateRideRequest {
    pub user_id: UserId,
    pub pickup_coordinate: Coordinate,
    pub destination_coordinate: Coordinate,
}

#[derive(Debug, Serialize)]
pub struct CreateRideResponse {
    pub ride_id: RideId,
    pub fare: i64,
}

pub async fn create_ride_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Json(body): Json<CreateRideRequest>,
) -> ApiResult<(StatusCode, Json<CreateRideResponse>)> {
    let ride = create_ride(
        body.user_id,
        body.pickup_coordinate,
        body.destination_coordinate,
        &kernel,
    )
    .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(CreateRideResponse {
            ride_id: ride.id,
            fare: ride.fare(),
        }),
    ))
}

pub async fn list_rides_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(user_id): Path<UserId>,
) -> ApiResult<Json<Vec<Ride>>> {
    Ok(Json(list_rides(user_id, &kernel).await?))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRideRequest {
    pub evaluation: i32,
}

pub async fn evaluate_ride_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(ride_id): Path<RideId>,
    Json(body): Json<EvaluateRideRequest>,
) -> ApiResult<Json<EvaluatedRide>> {
    Ok(Json(evaluate_ride(ride_id, body.evaluation, &kernel).await?))
}

#[derive(Debug, Serialize)]
pub struct RideStatusResponse {
    pub status: RideStatusLabel,
}

/// `GET /api/rides/:ride_id/status` - 204 while the ride has no status yet.
pub async fn ride_status_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(ride_id): Path<RideId>,
) -> ApiResult<Json<RideStatusResponse>> {
    let status = kernel.ride_status.latest_status(ride_id).await?;
    Ok(Json(RideStatusResponse { status }))
}
