//! Domain types for planboard.
//!
//! These types use ts-rs and schemars to generate TypeScript definitions
//! and JSON schemas for the dashboard front end from a single Rust source
//! of truth.

mod plan;
mod role;

pub use plan::{
    NewPlan, Plan, PlanPriority, PlanStatus, ReadinessItem, ReadinessStatus,
    UnknownLabel,
};
pub use role::{Actor, Role, UnknownRole, DEFAULT_PARTICIPATING_ROLES};
