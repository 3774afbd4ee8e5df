//! Route handlers for the REST API.

pub mod health;
pub mod notifications;
pub mod plans;
pub mod readiness;
pub mod reports;
pub mod session;
pub mod users;
