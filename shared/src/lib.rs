//! Domain types and client-side rules shared by the MaintDesk front end and
//! the development backend.

pub mod config;
pub mod error;
pub mod fetch;
pub mod fields;
pub mod models;
pub mod payloads;
pub mod query;
pub mod reference;
pub mod reports;
pub mod session;
pub mod workflow;

pub use error::{ApiError, ApiResult, FieldError};
pub use models::*;
pub use payloads::*;
pub use workflow::{Actor, WorkflowError};
