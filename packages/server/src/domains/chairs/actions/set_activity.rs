//! Chair activity toggle

use tracing::info;

use crate::common::ChairId;
use crate::domains::chairs::error::ChairError;
use crate::domains::chairs::models::Chair;
use crate::kernel::ServerKernel;

/// Mark a chair as available for matching (or not). A chair that goes
/// inactive keeps the ride it is already serving.
pub async fn set_activity(
    chair_id: ChairId,
    is_active: bool,
    kernel: &ServerKernel,
) -> Result<Chair, ChairError> {
    let chair = Chair::set_active(chair_id, is_active, &kernel.db_pool)
        .await?
        .ok_or(ChairError::ChairNotFound(chair_id))?;

    info!(chair_id = %chair_id, is_active, "Chair activity updated");
    Ok(chair)
}
