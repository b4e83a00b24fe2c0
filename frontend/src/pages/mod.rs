pub mod admin;
pub mod facilities;
pub mod login;
pub mod reports;
pub mod sections;
pub mod technician;
pub mod tickets;
pub mod users;
