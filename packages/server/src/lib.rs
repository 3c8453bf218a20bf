// Ride Dispatch - API Core
//
// Backend for pairing waiting rides with idle chairs and tracking each ride's
// status lifecycle.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
