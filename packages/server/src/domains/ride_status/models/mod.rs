pub mod ride_status;

pub use ride_status::RideStatus;
