use serde::{Deserialize, Serialize};

/// A point on the integer dispatch grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: i32,
    pub longitude: i32,
}

impl Coordinate {
    pub fn new(latitude: i32, longitude: i32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Manhattan distance, `|Δlat| + |Δlon|`.
    pub fn distance_to(&self, other: &Coordinate) -> i64 {
        (i64::from(self.latitude) - i64::from(other.latitude)).abs()
            + (i64::from(self.longitude) - i64::from(other.longitude)).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_is_symmetric() {
        let a = Coordinate::new(0, 0);
        let b = Coordinate::new(-3, 4);
        assert_eq!(a.distance_to(&b), 7);
        assert_eq!(b.distance_to(&a), 7);
    }

    #[test]
    fn distance_does_not_overflow_at_extremes() {
        let a = Coordinate::new(i32::MIN, i32::MIN);
        let b = Coordinate::new(i32::MAX, i32::MAX);
        assert_eq!(a.distance_to(&b), 2 * (u32::MAX as i64));
    }
}
