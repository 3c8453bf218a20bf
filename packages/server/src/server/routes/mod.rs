// HTTP routes
pub mod chairs;
pub mod health;
pub mod internal;
pub mod notifications;
pub mod rides;

pub use chairs::*;
pub use health::*;
pub use internal::*;
pub use notifications::*;
pub use rides::*;
