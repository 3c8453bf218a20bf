mod create_ride;
mod evaluate_ride;
mod register_payment_token;

pub use create_ride::{create_ride, list_rides};
pub use evaluate_ride::{evaluate_ride, EvaluatedRide};
pub use register_payment_token::register_payment_token;
