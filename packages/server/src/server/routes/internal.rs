use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode};

use crate::domains::matching::run_dispatch;
use crate::kernel::ServerKernel;
use crate::server::error::ApiResult;

/// `GET /api/internal/matching`
///
/// Runs one matching attempt. 204 whether or not a ride was matched; 500 if
/// the attempt failed.
pub async fn matching_handler(
    Extension(kernel): Extension<Arc<ServerKernel>>,
) -> ApiResult<StatusCode> {
    run_dispatch(&kernel.matching).await?;
    Ok(StatusCode::NO_CONTENT)
}
