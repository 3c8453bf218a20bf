pub mod chair;
pub mod chair_location;

pub use chair::Chair;
pub use chair_location::ChairLocation;
