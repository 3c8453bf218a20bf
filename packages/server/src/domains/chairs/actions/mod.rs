mod list_owner_chairs;
mod post_ride_status;
mod register_chair;
mod report_location;
mod set_activity;

pub use list_owner_chairs::{list_owner_chairs, OwnedChair};
pub use post_ride_status::post_ride_status;
pub use register_chair::register_chair;
pub use report_location::report_location;
pub use set_activity::set_activity;
