pub mod payment_token;
pub mod ride;

pub use payment_token::PaymentToken;
pub use ride::{calculate_fare, Ride, FARE_PER_DISTANCE, INITIAL_FARE};
