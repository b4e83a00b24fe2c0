pub mod auth;
pub mod layout;
pub mod tickets;
pub mod toast;
pub mod workflow;

pub use auth::*;
