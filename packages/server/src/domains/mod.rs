// Business domains
pub mod accounts;
pub mod chairs;
pub mod matching;
pub mod ride_status;
pub mod rides;
