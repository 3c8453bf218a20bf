pub mod owner;
pub mod user;

pub use owner::Owner;
pub use user::User;
