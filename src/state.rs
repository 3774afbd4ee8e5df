//! In-memory board state: the plan store and its notification feed.
//!
//! `BoardState` owns the ordered plan collection. Each mutation runs the
//! matching [`crate::workflow`] function against the stored plan and swaps the
//! result in only on success, so every update is all-or-nothing. Callers that
//! share the board wrap it in a single lock; holding the write guard across
//! check and swap is what makes production start a compare-and-swap.

use chrono::{DateTime, Utc};

use crate::config::PlanningConfig;
use crate::notifications::{NotificationFeed, NotificationKind};
use crate::types::{Actor, NewPlan, Plan, PlanStatus, ReadinessStatus, Role};
use crate::workflow::{self, CreationRules, WorkflowError};

#[derive(Debug, Clone)]
pub struct BoardState {
    plans: Vec<Plan>,
    notifications: NotificationFeed,
    participating_roles: Vec<Role>,
    machines: Vec<String>,
    next_seq: u32,
}

/// Plan counts by derived status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub created: usize,
    pub production_ready: usize,
    pub production_started: usize,
}

impl StatusCounts {
    pub fn of<'a>(plans: impl IntoIterator<Item = &'a Plan>) -> Self {
        plans.into_iter().fold(Self::default(), |mut acc, plan| {
            acc.total += 1;
            match plan.status() {
                PlanStatus::Created => acc.created += 1,
                PlanStatus::ProductionReady => acc.production_ready += 1,
                PlanStatus::ProductionStarted => acc.production_started += 1,
            }
            acc
        })
    }
}

impl BoardState {
    /// Empty board using the configured checklist roles and machines
    pub fn new(planning: &PlanningConfig) -> Self {
        Self {
            plans: Vec::new(),
            notifications: NotificationFeed::new(),
            participating_roles: planning.participating_roles.clone(),
            machines: planning.machines.clone(),
            next_seq: 1,
        }
    }

    /// Board for the configuration, seeded with demo plans when enabled
    pub fn load(planning: &PlanningConfig) -> Result<Self, WorkflowError> {
        let mut board = Self::new(planning);
        if planning.seed_demo_data {
            let count = crate::seed::load_demo_plans(&mut board, Utc::now())?;
            tracing::info!(count, "Seeded demo plans");
        }
        Ok(board)
    }

    /// Plans in creation order
    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    pub fn get(&self, plan_id: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.id.eq_ignore_ascii_case(plan_id))
    }

    pub fn participating_roles(&self) -> &[Role] {
        &self.participating_roles
    }

    pub fn machines(&self) -> &[String] {
        &self.machines
    }

    pub fn notifications(&self) -> &NotificationFeed {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut NotificationFeed {
        &mut self.notifications
    }

    pub fn status_counts(&self) -> StatusCounts {
        StatusCounts::of(&self.plans)
    }

    fn index_of(&self, plan_id: &str) -> Result<usize, WorkflowError> {
        self.plans
            .iter()
            .position(|p| p.id.eq_ignore_ascii_case(plan_id))
            .ok_or_else(|| WorkflowError::NotFound(format!("plan {}", plan_id)))
    }

    /// Create a plan and announce it
    pub fn create_plan(
        &mut self,
        actor: &Actor,
        fields: NewPlan,
        now: DateTime<Utc>,
    ) -> Result<&Plan, WorkflowError> {
        let rules = CreationRules {
            participating_roles: &self.participating_roles,
            machines: &self.machines,
        };
        let id = format!("PLAN-{:03}", self.next_seq);
        let plan = workflow::create_plan(id, fields, actor, &rules, now).inspect_err(|e| {
            tracing::warn!(actor = %actor.id, role = %actor.role, error = %e, "Plan creation rejected");
        })?;
        // sequence numbers are consumed only by accepted plans
        self.next_seq += 1;

        tracing::info!(
            plan_id = %plan.id,
            machine = %plan.machine_name,
            items = plan.readiness.len(),
            by = %actor.id,
            "Plan created"
        );
        self.notifications.push(
            NotificationKind::NewPlan,
            &plan.id,
            format!(
                "Plan {} created for {} on {}",
                plan.id, plan.part_name, plan.machine_name
            ),
            now,
        );

        self.plans.push(plan);
        Ok(&self.plans[self.plans.len() - 1])
    }

    /// Update one checklist slot
    pub fn set_readiness(
        &mut self,
        plan_id: &str,
        actor: &Actor,
        target: Role,
        status: ReadinessStatus,
        now: DateTime<Utc>,
    ) -> Result<&Plan, WorkflowError> {
        let index = self.index_of(plan_id)?;
        let current = &self.plans[index];

        let updated = workflow::set_readiness(current, actor, target, status, now).inspect_err(|e| {
            tracing::warn!(plan_id = %current.id, actor = %actor.id, role = %actor.role, error = %e, "Readiness update rejected");
        })?;

        let previous_item = workflow::my_item(current, target).map(|i| i.status);
        let before = current.status();
        let after = updated.status();

        tracing::debug!(
            plan_id = %updated.id,
            role = %target,
            status = status.as_str(),
            by = %actor.id,
            "Readiness updated"
        );

        if before != PlanStatus::ProductionReady && after == PlanStatus::ProductionReady {
            self.notifications.push(
                NotificationKind::ProductionReady,
                &updated.id,
                format!(
                    "Plan {} is production ready: all readiness checks complete",
                    updated.id
                ),
                now,
            );
        }

        let regressed = status == ReadinessStatus::NotReady
            || (previous_item == Some(ReadinessStatus::Ready)
                && status == ReadinessStatus::Pending);
        if regressed {
            let label = workflow::my_item(&updated, target)
                .map(|i| i.label.clone())
                .unwrap_or_else(|| target.to_string());
            self.notifications.push(
                NotificationKind::ReadinessPending,
                &updated.id,
                format!("{} for plan {} is {}", label, updated.id, status.as_str()),
                now,
            );
        }

        self.plans[index] = updated;
        Ok(&self.plans[index])
    }

    /// Fire the terminal production-start transition
    pub fn start_production(
        &mut self,
        plan_id: &str,
        actor: &Actor,
        now: DateTime<Utc>,
    ) -> Result<&Plan, WorkflowError> {
        let index = self.index_of(plan_id)?;
        let current = &self.plans[index];

        let started = workflow::start_production(current, actor, now).inspect_err(|e| {
            tracing::warn!(plan_id = %current.id, actor = %actor.id, role = %actor.role, error = %e, "Production start rejected");
        })?;

        tracing::info!(plan_id = %started.id, by = %actor.id, "Production started");
        self.notifications.push(
            NotificationKind::ProductionStarted,
            &started.id,
            format!("Production started on plan {} by {}", started.id, actor.id),
            now,
        );

        self.plans[index] = started;
        Ok(&self.plans[index])
    }
}
