pub mod analytics;
pub mod store;
