use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stage in a ride's lifecycle, stored as text in `ride_statuses.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatusLabel {
    /// A chair has been assigned by the matching engine.
    Matched,
    /// The chair accepted and is heading to the pickup point.
    Enroute,
    /// The chair reached the pickup point.
    Pickup,
    /// The requester is on board.
    Carrying,
    /// The chair reached the destination.
    Arrived,
    /// The requester evaluated the ride and paid.
    Completed,
}

impl RideStatusLabel {
    /// Every label, in lifecycle order.
    pub const LIFECYCLE: [RideStatusLabel; 6] = [
        RideStatusLabel::Matched,
        RideStatusLabel::Enroute,
        RideStatusLabel::Pickup,
        RideStatusLabel::Carrying,
        RideStatusLabel::Arrived,
        RideStatusLabel::Completed,
    ];

    /// Number of distinct labels a ride records before it is complete.
    pub fn lifecycle_len() -> usize {
        Self::LIFECYCLE.len()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RideStatusLabel::Matched => "MATCHED",
            RideStatusLabel::Enroute => "ENROUTE",
            RideStatusLabel::Pickup => "PICKUP",
            RideStatusLabel::Carrying => "CARRYING",
            RideStatusLabel::Arrived => "ARRIVED",
            RideStatusLabel::Completed => "COMPLETED",
        }
    }

    /// The label that must be latest before this one may be appended.
    pub fn predecessor(&self) -> Option<RideStatusLabel> {
        let idx = Self::LIFECYCLE.iter().position(|l| l == self)?;
        idx.checked_sub(1).map(|prev| Self::LIFECYCLE[prev])
    }

    pub fn is_terminal(&self) -> bool {
        Self::LIFECYCLE.last() == Some(self)
    }
}

impl fmt::Display for RideStatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown ride status label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for RideStatusLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::LIFECYCLE
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

impl TryFrom<String> for RideStatusLabel {
    type Error = UnknownLabel;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
