//! Register chair action

use tracing::info;

use crate::common::OwnerId;
use crate::domains::accounts::Owner;
use crate::domains::chairs::error::ChairError;
use crate::domains::chairs::models::Chair;
use crate::kernel::ServerKernel;

/// Register a new, inactive chair for an owner.
pub async fn register_chair(
    owner_id: OwnerId,
    name: &str,
    model: &str,
    kernel: &ServerKernel,
) -> Result<Chair, ChairError> {
    if Owner::find_by_id(owner_id, &kernel.db_pool).await?.is_none() {
        return Err(ChairError::OwnerNotFound(owner_id));
    }

    let chair = Chair::create(owner_id, name, model, &kernel.db_pool).await?;
    info!(chair_id = %chair.id, owner_id = %owner_id, "Chair registered");
    Ok(chair)
}
