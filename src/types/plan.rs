//! Plan and readiness checklist types.
//!
//! A [`Plan`] is a production work order. Its checklist holds exactly one
//! [`ReadinessItem`] per participating role, fixed when the plan is created.
//! The plan's [`PlanStatus`] is not stored: it is derived from the checklist
//! and the production-start stamp (see [`crate::workflow::derive_status`]).

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use super::role::Role;
use crate::workflow;

/// Status of one role's checklist entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, JsonSchema, ToSchema,
)]
#[ts(export)]
pub enum ReadinessStatus {
    #[default]
    Pending,
    Ready,
    #[serde(rename = "Not Ready")]
    NotReady,
}

impl ReadinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadinessStatus::Pending => "Pending",
            ReadinessStatus::Ready => "Ready",
            ReadinessStatus::NotReady => "Not Ready",
        }
    }
}

/// Scheduling priority of a plan
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, JsonSchema, ToSchema,
)]
#[ts(export)]
pub enum PlanPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl PlanPriority {
    pub fn all() -> &'static [PlanPriority] {
        &[PlanPriority::High, PlanPriority::Medium, PlanPriority::Low]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanPriority::High => "High",
            PlanPriority::Medium => "Medium",
            PlanPriority::Low => "Low",
        }
    }
}

/// Lifecycle state of a plan: Created -> Production Ready -> Production Started
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS, JsonSchema, ToSchema,
)]
#[ts(export)]
pub enum PlanStatus {
    Created,
    #[serde(rename = "Production Ready")]
    ProductionReady,
    #[serde(rename = "Production Started")]
    ProductionStarted,
}

impl PlanStatus {
    pub fn all() -> &'static [PlanStatus] {
        &[
            PlanStatus::Created,
            PlanStatus::ProductionReady,
            PlanStatus::ProductionStarted,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Created => "Created",
            PlanStatus::ProductionReady => "Production Ready",
            PlanStatus::ProductionStarted => "Production Started",
        }
    }

    /// Terminal state: the plan is locked
    pub fn is_terminal(&self) -> bool {
        matches!(self, PlanStatus::ProductionStarted)
    }
}

/// Error returned when parsing an unknown status or priority label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownLabel {
    pub kind: &'static str,
    pub value: String,
}

fn parse_label<T: Copy>(
    kind: &'static str,
    value: &str,
    all: &[T],
    label: impl Fn(&T) -> &'static str,
) -> Result<T, UnknownLabel> {
    let wanted = value.trim().replace(['_', '-'], " ");
    all.iter()
        .copied()
        .find(|candidate| label(candidate).eq_ignore_ascii_case(&wanted))
        .ok_or_else(|| UnknownLabel {
            kind,
            value: value.to_string(),
        })
}

impl FromStr for ReadinessStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let all = [
            ReadinessStatus::Pending,
            ReadinessStatus::Ready,
            ReadinessStatus::NotReady,
        ];
        parse_label("readiness status", s, &all, ReadinessStatus::as_str)
    }
}

impl FromStr for PlanPriority {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("priority", s, PlanPriority::all(), PlanPriority::as_str)
    }
}

impl FromStr for PlanStatus {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_label("plan status", s, PlanStatus::all(), PlanStatus::as_str)
    }
}

/// One role's slot in a plan's readiness checklist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct ReadinessItem {
    /// The only role allowed to update this slot
    pub role: Role,
    /// Checklist label (e.g., "QA Status")
    pub label: String,
    pub status: ReadinessStatus,
    /// Actor id of the last update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ReadinessItem {
    /// Create a pending slot for a role
    pub fn pending(role: Role) -> Self {
        Self {
            role,
            label: role.readiness_label().to_string(),
            status: ReadinessStatus::Pending,
            updated_by: None,
            updated_at: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReadinessStatus::Ready
    }
}

/// A production plan
///
/// Client bindings and schemas are exported from
/// [`crate::rest::dto::PlanResponse`], which carries the derived status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Store-assigned identifier (e.g., "PLAN-001")
    pub id: String,

    // ─────────────────────────────────────────────────────────────────────
    // Identification
    // ─────────────────────────────────────────────────────────────────────
    pub machine_name: String,
    pub order_no: String,
    pub part_number: String,
    pub part_name: String,
    pub traveller_no: String,
    pub fixture_no: String,
    pub program_name: String,

    // ─────────────────────────────────────────────────────────────────────
    // Scheduling
    // ─────────────────────────────────────────────────────────────────────
    pub plan_quantity: u32,
    pub start_date: NaiveDate,
    pub priority: PlanPriority,

    // ─────────────────────────────────────────────────────────────────────
    // Readiness checklist (one item per participating role, fixed order)
    // ─────────────────────────────────────────────────────────────────────
    pub readiness: Vec<ReadinessItem>,

    // ─────────────────────────────────────────────────────────────────────
    // Audit
    // ─────────────────────────────────────────────────────────────────────
    pub created_by: String,
    pub created_at: DateTime<Utc>,

    /// Set once, by the production-start transition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_started_by: Option<String>,
}

impl Plan {
    /// Current lifecycle state, derived from the checklist and start stamp
    pub fn status(&self) -> PlanStatus {
        workflow::derive_status(self)
    }

    /// True once production has started; no further edits are accepted
    pub fn is_locked(&self) -> bool {
        self.production_started_at.is_some()
    }

    pub fn is_fully_ready(&self) -> bool {
        workflow::is_fully_ready(self)
    }

    /// The checklist slot owned by `role`, if the role participates
    pub fn item_for(&self, role: Role) -> Option<&ReadinessItem> {
        workflow::my_item(self, role)
    }

    /// Roles that own a checklist slot, in checklist order
    pub fn participating_roles(&self) -> Vec<Role> {
        self.readiness.iter().map(|item| item.role).collect()
    }
}

/// Fields supplied when creating a plan.
///
/// Everything is optional at the wire level so that validation can report
/// every missing field at once instead of failing on the first.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct NewPlan {
    #[serde(default)]
    pub machine_name: String,
    #[serde(default)]
    pub order_no: String,
    #[serde(default)]
    pub part_number: String,
    #[serde(default)]
    pub part_name: String,
    #[serde(default)]
    pub plan_quantity: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: PlanPriority,
    #[serde(default)]
    pub traveller_no: String,
    #[serde(default)]
    pub fixture_no: String,
    #[serde(default)]
    pub program_name: String,
}
