//! Typed ID definitions for all domain entities.

pub use super::id::Id;

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for ride requesters.
pub struct User;

/// Marker type for chair owners.
pub struct Owner;

/// Marker type for chairs (vehicles).
pub struct Chair;

/// Marker type for chair location reports.
pub struct ChairLocation;

/// Marker type for rides.
pub struct Ride;

/// Marker type for ride status events.
pub struct RideStatus;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

pub type UserId = Id<User>;
pub type OwnerId = Id<Owner>;
pub type ChairId = Id<Chair>;
pub type ChairLocationId = Id<ChairLocation>;
pub type RideId = Id<Ride>;
pub type RideStatusId = Id<RideStatus>;
