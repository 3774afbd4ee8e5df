//! Planboard - production plan readiness tracking
//!
//! Tracks each production plan's per-role readiness checklist and gates the
//! one-way transition into production. The core lives in [`workflow`] and
//! [`state`]; [`rest`] serves it over HTTP.

pub mod capabilities;
pub mod config;
pub mod logging;
pub mod notifications;
pub mod reports;
pub mod rest;
pub mod seed;
pub mod state;
pub mod types;
pub mod users;
pub mod workflow;
