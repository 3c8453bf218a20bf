//! List an owner's chairs with where each last reported.

use serde::Serialize;

use crate::common::OwnerId;
use crate::domains::accounts::Owner;
use crate::domains::chairs::error::ChairError;
use crate::domains::chairs::models::{Chair, ChairLocation};
use crate::kernel::ServerKernel;

#[derive(Debug, Clone, Serialize)]
pub struct OwnedChair {
    #[serde(flatten)]
    pub chair: Chair,
    pub location: Option<ChairLocation>,
}

/// Served from the read pool; a location a few moments stale is fine here.
pub async fn list_owner_chairs(
    owner_id: OwnerId,
    kernel: &ServerKernel,
) -> Result<Vec<OwnedChair>, ChairError> {
    if Owner::find_by_id(owner_id, &kernel.read_pool).await?.is_none() {
        return Err(ChairError::OwnerNotFound(owner_id));
    }

    let chairs = Chair::list_by_owner(owner_id, &kernel.read_pool).await?;
    let mut owned = Vec::with_capacity(chairs.len());
    for chair in chairs {
        let location = ChairLocation::latest_for_chair(chair.id, &kernel.read_pool).await?;
        owned.push(OwnedChair { chair, location });
    }
    Ok(owned)
}
