//! Role capability table.
//!
//! Decides which dashboard sections a role sees. Purely a lookup; the
//! workflow enforces its own role rules independently.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

use crate::types::Role;

/// Dashboard sections
///
/// Plans live in memory only, so there is no backup administration section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Section {
    Dashboard,
    Plans,
    MyReadiness,
    StreamStatus,
    Notifications,
    UserAdmin,
}

const READINESS_OWNERS: &[Role] = &[
    Role::NpdEngineer,
    Role::ToolCrib,
    Role::QaEngineer,
    Role::StoreExecutive,
    Role::ProductionSupervisor,
];

const PLANNERS: &[Role] = &[Role::Ppc, Role::AssistantManager];

impl Section {
    /// All sections in display order
    pub fn all() -> &'static [Section] {
        &[
            Section::Dashboard,
            Section::Plans,
            Section::MyReadiness,
            Section::StreamStatus,
            Section::Notifications,
            Section::UserAdmin,
        ]
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Section::Dashboard => "Dashboard",
            Section::Plans => "Plans",
            Section::MyReadiness => "My Readiness",
            Section::StreamStatus => "Stream Status",
            Section::Notifications => "Notifications",
            Section::UserAdmin => "Admin",
        }
    }

    /// Whether `role` may see this section
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Section::Dashboard | Section::StreamStatus => PLANNERS.contains(&role),
            Section::Plans => role != Role::Admin,
            Section::MyReadiness => READINESS_OWNERS.contains(&role),
            Section::Notifications => true,
            Section::UserAdmin => role == Role::Admin,
        }
    }
}

/// Sections visible to `role`, in display order
pub fn sections_for(role: Role) -> Vec<Section> {
    Section::all()
        .iter()
        .copied()
        .filter(|s| s.allows(role))
        .collect()
}

/// Only planners in the PPC role may create plans
pub fn can_create_plans(role: Role) -> bool {
    role == Role::Ppc
}
