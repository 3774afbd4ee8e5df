//! Read-only views over the plan store.
//!
//! Every view is computed from a plan slice on demand, so derived statuses in
//! reports always agree with the workflow.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};

use crate::state::StatusCounts;
use crate::types::{Plan, PlanPriority, PlanStatus, ReadinessItem, ReadinessStatus, Role};
use crate::workflow;

/// Number of plans listed on the dashboard
pub const RECENT_PLAN_LIMIT: usize = 5;

/// Plan list filter; every set field must match
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS, JsonSchema, ToSchema, IntoParams)]
#[ts(export)]
#[into_params(parameter_in = Query)]
pub struct PlanFilter {
    /// Case-insensitive match on plan id, part name or machine name
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<PlanStatus>,
    #[serde(default)]
    pub priority: Option<PlanPriority>,
    #[serde(default)]
    pub machine: Option<String>,
}

impl PlanFilter {
    pub fn matches(&self, plan: &Plan) -> bool {
        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = [&plan.id, &plan.part_name, &plan.machine_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != plan.status()) {
            return false;
        }
        if self.priority.is_some_and(|p| p != plan.priority) {
            return false;
        }
        if let Some(machine) = self.machine.as_deref().filter(|m| !m.is_empty()) {
            if !plan.machine_name.eq_ignore_ascii_case(machine) {
                return false;
            }
        }
        true
    }
}

/// Plans matching `filter`, in store order
pub fn filter_plans<'a>(plans: &'a [Plan], filter: &PlanFilter) -> Vec<&'a Plan> {
    plans.iter().filter(|p| filter.matches(p)).collect()
}

/// Compact plan line used by the dashboard and the readiness matrix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct PlanRow {
    pub id: String,
    pub part_number: String,
    pub part_name: String,
    pub machine_name: String,
    pub priority: PlanPriority,
    pub start_date: NaiveDate,
    pub status: PlanStatus,
    /// Checklist items not yet Ready
    pub pending: usize,
    pub readiness: Vec<ReadinessItem>,
}

impl From<&Plan> for PlanRow {
    fn from(plan: &Plan) -> Self {
        Self {
            id: plan.id.clone(),
            part_number: plan.part_number.clone(),
            part_name: plan.part_name.clone(),
            machine_name: plan.machine_name.clone(),
            priority: plan.priority,
            start_date: plan.start_date,
            status: plan.status(),
            pending: workflow::pending_count(plan),
            readiness: plan.readiness.clone(),
        }
    }
}

/// Plan counts by status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct StatusSummary {
    pub total: usize,
    pub created: usize,
    pub production_ready: usize,
    pub production_started: usize,
}

impl From<StatusCounts> for StatusSummary {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total,
            created: counts.created,
            production_ready: counts.production_ready,
            production_started: counts.production_started,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct DashboardSummary {
    pub counts: StatusSummary,
    /// Latest plans, newest first
    pub recent: Vec<PlanRow>,
}

pub fn dashboard(plans: &[Plan]) -> DashboardSummary {
    DashboardSummary {
        counts: StatusCounts::of(plans).into(),
        recent: plans
            .iter()
            .rev()
            .take(RECENT_PLAN_LIMIT)
            .map(PlanRow::from)
            .collect(),
    }
}

/// Rounded percentage; zero when `whole` is zero
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    u32::try_from((part * 100 + whole / 2) / whole).unwrap_or(100)
}

/// Headline numbers over the whole store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct Kpis {
    #[serde(flatten)]
    pub counts: StatusSummary,
    /// Share of plans that are ready or started, in percent
    pub completion_rate: u32,
}

/// Readiness tallies for one participating role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct RoleReadiness {
    pub role: Role,
    pub label: String,
    pub ready: usize,
    pub pending: usize,
    pub not_ready: usize,
    pub ready_rate: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct MachineLoad {
    pub machine: String,
    pub plans: usize,
    pub ready: usize,
    pub started: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct PriorityCount {
    pub priority: PlanPriority,
    pub count: usize,
}

/// Stream-wide readiness analytics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct StreamStatus {
    pub kpis: Kpis,
    pub by_role: Vec<RoleReadiness>,
    pub by_machine: Vec<MachineLoad>,
    pub by_priority: Vec<PriorityCount>,
    /// Filtered plans with their full checklist
    pub matrix: Vec<PlanRow>,
}

/// Build the stream view. KPIs, role and priority tallies cover every plan;
/// the machine breakdown and matrix honour `filter`.
pub fn stream_status(
    plans: &[Plan],
    participating_roles: &[Role],
    machines: &[String],
    filter: &PlanFilter,
) -> StreamStatus {
    let counts = StatusCounts::of(plans);
    let kpis = Kpis {
        counts: counts.into(),
        completion_rate: percent(
            counts.production_ready + counts.production_started,
            counts.total,
        ),
    };

    let by_role = participating_roles
        .iter()
        .map(|role| role_readiness(plans, *role))
        .collect();

    let by_priority = PlanPriority::all()
        .iter()
        .map(|priority| PriorityCount {
            priority: *priority,
            count: plans.iter().filter(|p| p.priority == *priority).count(),
        })
        .collect();

    let filtered = filter_plans(plans, filter);

    let mut machine_names: Vec<&str> = machines.iter().map(String::as_str).collect();
    for plan in &filtered {
        if !machine_names.contains(&plan.machine_name.as_str()) {
            machine_names.push(&plan.machine_name);
        }
    }
    if let Some(machine) = filter.machine.as_deref().filter(|m| !m.is_empty()) {
        machine_names.retain(|m| m.eq_ignore_ascii_case(machine));
    }
    let by_machine = machine_names
        .into_iter()
        .map(|machine| {
            let on_machine = filtered.iter().filter(|p| p.machine_name == machine);
            let counts = StatusCounts::of(on_machine.copied());
            MachineLoad {
                machine: machine.to_string(),
                plans: counts.total,
                ready: counts.production_ready,
                started: counts.production_started,
            }
        })
        .collect();

    StreamStatus {
        kpis,
        by_role,
        by_machine,
        by_priority,
        matrix: filtered.into_iter().map(PlanRow::from).collect(),
    }
}

fn role_readiness(plans: &[Plan], role: Role) -> RoleReadiness {
    let mut tally = RoleReadiness {
        role,
        label: role.readiness_label().to_string(),
        ready: 0,
        pending: 0,
        not_ready: 0,
        ready_rate: 0,
    };
    for item in plans.iter().filter_map(|p| p.item_for(role)) {
        match item.status {
            ReadinessStatus::Ready => tally.ready += 1,
            ReadinessStatus::Pending => tally.pending += 1,
            ReadinessStatus::NotReady => tally.not_ready += 1,
        }
    }
    tally.ready_rate = percent(tally.ready, tally.ready + tally.pending + tally.not_ready);
    tally
}

/// One plan as seen by the owner of one of its checklist slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct MyReadinessRow {
    pub plan_id: String,
    pub part_name: String,
    pub machine_name: String,
    pub priority: PlanPriority,
    pub start_date: NaiveDate,
    pub plan_status: PlanStatus,
    pub label: String,
    pub status: ReadinessStatus,
    /// False once production has started
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, JsonSchema, ToSchema)]
#[ts(export)]
pub struct MyReadiness {
    pub role: Role,
    pub pending: usize,
    pub ready: usize,
    pub not_ready: usize,
    pub items: Vec<MyReadinessRow>,
}

/// Plans carrying a checklist slot for `role`
pub fn my_readiness(plans: &[Plan], role: Role) -> MyReadiness {
    let items: Vec<MyReadinessRow> = plans
        .iter()
        .filter_map(|plan| {
            let plan_status = plan.status();
            plan.item_for(role).map(|item| MyReadinessRow {
                plan_id: plan.id.clone(),
                part_name: plan.part_name.clone(),
                machine_name: plan.machine_name.clone(),
                priority: plan.priority,
                start_date: plan.start_date,
                plan_status,
                label: item.label.clone(),
                status: item.status,
                editable: !plan_status.is_terminal(),
            })
        })
        .collect();

    let count = |status: ReadinessStatus| items.iter().filter(|i| i.status == status).count();
    MyReadiness {
        role,
        pending: count(ReadinessStatus::Pending),
        ready: count(ReadinessStatus::Ready),
        not_ready: count(ReadinessStatus::NotReady),
        items,
    }
}
