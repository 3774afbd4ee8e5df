//! Roles and actors.
//!
//! A [`Role`] is an immutable identity tag from a closed set. An [`Actor`] is
//! the `{id, role}` pair the session layer hands to every core operation.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::ToSchema;

/// Closed set of user roles
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS, JsonSchema, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Role {
    Admin,
    Ppc,
    NpdEngineer,
    ToolCrib,
    QaEngineer,
    StoreExecutive,
    ProductionSupervisor,
    AssistantManager,
}

/// Roles that own a readiness slot on newly created plans, in checklist order
pub const DEFAULT_PARTICIPATING_ROLES: [Role; 5] = [
    Role::NpdEngineer,
    Role::ToolCrib,
    Role::QaEngineer,
    Role::StoreExecutive,
    Role::ProductionSupervisor,
];

impl Role {
    /// Get all roles in declaration order
    pub fn all() -> &'static [Role] {
        &[
            Role::Admin,
            Role::Ppc,
            Role::NpdEngineer,
            Role::ToolCrib,
            Role::QaEngineer,
            Role::StoreExecutive,
            Role::ProductionSupervisor,
            Role::AssistantManager,
        ]
    }

    /// Wire label (e.g., "NPD_ENGINEER")
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Ppc => "PPC",
            Role::NpdEngineer => "NPD_ENGINEER",
            Role::ToolCrib => "TOOL_CRIB",
            Role::QaEngineer => "QA_ENGINEER",
            Role::StoreExecutive => "STORE_EXECUTIVE",
            Role::ProductionSupervisor => "PRODUCTION_SUPERVISOR",
            Role::AssistantManager => "ASSISTANT_MANAGER",
        }
    }

    /// Human-readable name (e.g., "NPD Engineer")
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Ppc => "PPC",
            Role::NpdEngineer => "NPD Engineer",
            Role::ToolCrib => "Tool Crib",
            Role::QaEngineer => "QA Engineer",
            Role::StoreExecutive => "Store Executive",
            Role::ProductionSupervisor => "Production Supervisor",
            Role::AssistantManager => "Assistant Manager",
        }
    }

    /// Checklist label used for this role's readiness slot
    pub fn readiness_label(&self) -> &'static str {
        match self {
            Role::NpdEngineer => "NPD Status",
            Role::ToolCrib => "Tool Crib Status",
            Role::QaEngineer => "QA Status",
            Role::StoreExecutive => "Store Status",
            Role::ProductionSupervisor => "Production Status",
            Role::Admin => "Admin Status",
            Role::Ppc => "PPC Status",
            Role::AssistantManager => "Assistant Manager Status",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace([' ', '-'], "_");
        Role::all()
            .iter()
            .copied()
            .find(|r| r.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// The identity performing an operation, as supplied by the session layer.
///
/// The core trusts this value and only checks `role` against its rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct Actor {
    /// User id recorded in audit fields
    pub id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}
