pub mod api_analytics;
pub mod api_auth;
pub mod api_reference;
pub mod api_reports;
pub mod api_tickets;
pub mod graphql;
