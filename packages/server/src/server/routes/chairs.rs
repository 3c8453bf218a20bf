//! Owner- and chair-facing routes.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::{ChairId, Coordinate, OwnerId, RideId};
use crate::domains::accounts::Owner;
use crate::domains::chairs::actions::{
    list_owner_chairs, post_ride_status, register_chair, report_location, set_activity,
    OwnedChair,
};
use crate::domains::ride_status::RideStatusLabel;
use crate::kernel::ServerKernel;
use crate::server::error::{ApiError, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterOwnerRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterOwnerResponse {
    pub id: OwnerId,
}

pub async fn register_owner_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Json(body): Json<RegisterOwnerRequest>,
) -> ApiResult<(StatusCode, Json<RegisterOwnerResponse>)> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_string()));
    }
    let owner = Owner::create(body.name.trim(), &kernel.db_pool).await?;
    Ok((StatusCode::CREATED, Json(RegisterOwnerResponse { id: owner.id })))
}

#[derive(Debug, Deserialize)]
pub struct RegisterChairRequest {
    pub name: String,
    pub model: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterChairResponse {
    pub id: ChairId,
    pub owner_id: OwnerId,
}

pub async fn register_chair_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(owner_id): Path<OwnerId>,
    Json(body): Json<RegisterChairRequest>,
) -> ApiResult<(StatusCode, Json<RegisterChairResponse>)> {
    if body.name.is_empty() || body.model.is_empty() {
        return Err(ApiError::BadRequest("name and model are required".to_string()));
    }
    let chair = register_chair(owner_id, &body.name, &body.model, &kernel).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterChairResponse {
            id: chair.id,
            owner_id: chair.owner_id,
        }),
    ))
}

pub async fn list_owner_chairs_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(owner_id): Path<OwnerId>,
) -> ApiResult<Json<Vec<OwnedChair>>> {
    Ok(Json(list_owner_chairs(owner_id, &kernel).await?))
}

#[derive(Debug, Deserialize)]
pub struct ActivityRequest {
    pub is_active: bool,
}

pub async fn chair_activity_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(chair_id): Path<ChairId>,
    Json(body): Json<ActivityRequest>,
) -> ApiResult<StatusCode> {
    set_activity(chair_id, body.is_active, &kernel).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
pub struct CoordinateResponse {
    pub recorded_at: DateTime<Utc>,
}

pub async fn chair_coordinate_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(chair_id): Path<ChairId>,
    Json(at): Json<Coordinate>,
) -> ApiResult<Json<CoordinateResponse>> {
    let location = report_location(chair_id, at, &kernel).await?;
    Ok(Json(CoordinateResponse {
        recorded_at: location.created_at,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RideStatusRequest {
    pub status: RideStatusLabel,
}

pub async fn chair_ride_status_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path((chair_id, ride_id)): Path<(ChairId, RideId)>,
    Json(body): Json<RideStatusRequest>,
) -> ApiResult<StatusCode> {
    post_ride_status(chair_id, ride_id, body.status, &kernel).await?;
    Ok(StatusCode::NO_CONTENT)
}
