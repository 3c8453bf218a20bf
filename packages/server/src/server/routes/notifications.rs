//! Notification polling: each call hands out the oldest event the client has
//! not seen and marks it delivered. 204 when there is nothing new.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::common::{RideId, RideStatusId};
use crate::domains::ride_status::{RideStatus, RideStatusLabel};
use crate::kernel::ServerKernel;
use crate::server::error::ApiResult;

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub ride_id: RideId,
    pub status_id: RideStatusId,
    pub status: RideStatusLabel,
    pub created_at: DateTime<Utc>,
}

impl From<RideStatus> for NotificationResponse {
    fn from(event: RideStatus) -> Self {
        Self {
            ride_id: event.ride_id,
            status_id: event.id,
            status: event.status,
            created_at: event.created_at,
        }
    }
}

pub async fn app_notification_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(ride_id): Path<RideId>,
) -> ApiResult<Json<NotificationResponse>> {
    let event = kernel.ride_status.deliver_to_requester(ride_id).await?;
    Ok(Json(event.into()))
}

pub async fn chair_notification_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
    Path(ride_id): Path<RideId>,
) -> ApiResult<Json<NotificationResponse>> {
    let event = kernel.ride_status.deliver_to_chair(ride_id).await?;
    Ok(Json(event.into()))
}
