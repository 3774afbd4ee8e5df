//! Plan readiness and production-start workflow.
//!
//! Every operation here is a pure function over a borrowed [`Plan`]: it either
//! returns the updated plan or a [`WorkflowError`] naming the precondition that
//! failed. Callers swap the returned plan into storage, so a rejected
//! operation never leaves a partially modified record behind.
//!
//! Lifecycle:
//!
//! ```text
//! Created --(all items Ready)--> Production Ready --(PPC start)--> Production Started
//!    ^                                  |
//!    +------(an item leaves Ready)------+
//! ```
//!
//! `Production Ready` is derived live from the checklist; only the
//! production-start transition is stored.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::{Actor, NewPlan, Plan, PlanStatus, ReadinessItem, ReadinessStatus, Role};

/// Rejections raised by workflow operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Role or lock violation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Actor tried to edit a checklist slot owned by another role
    #[error("role {actor} cannot update the {owner} readiness item")]
    NotOwner { actor: Role, owner: Role },

    /// Transition preconditions are not met
    #[error("plan {plan_id} is not eligible to start production: {pending} readiness item(s) not Ready")]
    NotEligible { plan_id: String, pending: usize },

    /// Production already started on this plan
    #[error("production already started on plan {plan_id}")]
    AlreadyStarted { plan_id: String },

    /// One or more creation fields are missing or invalid
    #[error("invalid plan: {}", .0.join("; "))]
    ValidationError(Vec<String>),

    /// Unknown plan or checklist slot
    #[error("{0} not found")]
    NotFound(String),
}

// =============================================================================
// Readiness aggregation
// =============================================================================

/// True iff every checklist item is Ready
pub fn is_fully_ready(plan: &Plan) -> bool {
    plan.readiness.iter().all(ReadinessItem::is_ready)
}

/// The checklist slot owned by `role`, or `None` if the role does not participate
pub fn my_item(plan: &Plan, role: Role) -> Option<&ReadinessItem> {
    plan.readiness.iter().find(|item| item.role == role)
}

/// Number of checklist items that are not yet Ready
pub fn pending_count(plan: &Plan) -> usize {
    plan.readiness.iter().filter(|item| !item.is_ready()).count()
}

/// Lifecycle state as exposed to callers.
///
/// A started plan stays started; otherwise the state follows the checklist,
/// so a regressed item drops the plan back to `Created`.
pub fn derive_status(plan: &Plan) -> PlanStatus {
    if plan.production_started_at.is_some() {
        PlanStatus::ProductionStarted
    } else if is_fully_ready(plan) {
        PlanStatus::ProductionReady
    } else {
        PlanStatus::Created
    }
}

// =============================================================================
// Readiness mutation
// =============================================================================

/// Set the status of the checklist slot owned by `target`.
///
/// Never changes the plan's lifecycle stamp; moving into production is the
/// separate [`start_production`] decision.
pub fn set_readiness(
    plan: &Plan,
    actor: &Actor,
    target: Role,
    status: ReadinessStatus,
    now: DateTime<Utc>,
) -> Result<Plan, WorkflowError> {
    if plan.is_locked() {
        return Err(WorkflowError::Forbidden(format!(
            "plan {} is locked: production has started",
            plan.id
        )));
    }

    let index = plan
        .readiness
        .iter()
        .position(|item| item.role == target)
        .ok_or_else(|| {
            WorkflowError::NotFound(format!("readiness item for {} on plan {}", target, plan.id))
        })?;

    if actor.role != target {
        return Err(WorkflowError::NotOwner {
            actor: actor.role,
            owner: target,
        });
    }

    let mut updated = plan.clone();
    let item = &mut updated.readiness[index];
    item.status = status;
    item.updated_by = Some(actor.id.clone());
    item.updated_at = Some(now);

    Ok(updated)
}

// =============================================================================
// Transition gate
// =============================================================================

/// Fire the terminal Production Started transition.
///
/// Only a PPC actor may fire it, and only while every checklist item is Ready.
pub fn start_production(
    plan: &Plan,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<Plan, WorkflowError> {
    if actor.role != Role::Ppc {
        return Err(WorkflowError::Forbidden(format!(
            "only PPC can start production, not {}",
            actor.role
        )));
    }

    if plan.is_locked() {
        return Err(WorkflowError::AlreadyStarted {
            plan_id: plan.id.clone(),
        });
    }

    if derive_status(plan) != PlanStatus::ProductionReady {
        return Err(WorkflowError::NotEligible {
            plan_id: plan.id.clone(),
            pending: pending_count(plan),
        });
    }

    let mut updated = plan.clone();
    updated.production_started_at = Some(now);
    updated.production_started_by = Some(actor.id.clone());

    Ok(updated)
}

// =============================================================================
// Plan creation
// =============================================================================

/// Rules applied when validating new plans
#[derive(Debug, Clone, Default)]
pub struct CreationRules<'a> {
    /// Roles that receive a checklist slot, in order
    pub participating_roles: &'a [Role],
    /// Allowed machine names (empty = any non-blank name)
    pub machines: &'a [String],
}

/// Validate creation fields, returning every problem found
pub fn validate_new_plan(fields: &NewPlan, rules: &CreationRules<'_>) -> Vec<String> {
    let mut errors = Vec::new();

    let required = [
        ("machine_name", &fields.machine_name),
        ("order_no", &fields.order_no),
        ("part_number", &fields.part_number),
        ("part_name", &fields.part_name),
        ("traveller_no", &fields.traveller_no),
        ("fixture_no", &fields.fixture_no),
        ("program_name", &fields.program_name),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("{} is required", name));
        }
    }

    let machine = fields.machine_name.trim();
    if !machine.is_empty()
        && !rules.machines.is_empty()
        && !rules.machines.iter().any(|m| m == machine)
    {
        errors.push(format!("machine_name '{}' is not a known machine", machine));
    }

    if fields.plan_quantity <= 0 {
        errors.push("plan_quantity must be greater than 0".to_string());
    } else if u32::try_from(fields.plan_quantity).is_err() {
        errors.push(format!("plan_quantity must not exceed {}", u32::MAX));
    }

    if fields.start_date.is_none() {
        errors.push("start_date is required".to_string());
    }

    if rules.participating_roles.is_empty() {
        errors.push("no participating roles configured".to_string());
    }

    errors
}

/// Create a plan with a fresh checklist of Pending items.
///
/// `id` is allocated by the caller's store. Only PPC actors may create plans.
pub fn create_plan(
    id: String,
    fields: NewPlan,
    actor: &Actor,
    rules: &CreationRules<'_>,
    now: DateTime<Utc>,
) -> Result<Plan, WorkflowError> {
    if actor.role != Role::Ppc {
        return Err(WorkflowError::Forbidden(format!(
            "only PPC can create plans, not {}",
            actor.role
        )));
    }

    let errors = validate_new_plan(&fields, rules);
    if !errors.is_empty() {
        return Err(WorkflowError::ValidationError(errors));
    }

    let (Some(start_date), Ok(plan_quantity)) =
        (fields.start_date, u32::try_from(fields.plan_quantity))
    else {
        return Err(WorkflowError::ValidationError(vec![
            "invalid start_date or plan_quantity".to_string(),
        ]));
    };

    Ok(Plan {
        id,
        machine_name: fields.machine_name.trim().to_string(),
        order_no: fields.order_no.trim().to_string(),
        part_number: fields.part_number.trim().to_string(),
        part_name: fields.part_name.trim().to_string(),
        traveller_no: fields.traveller_no.trim().to_string(),
        fixture_no: fields.fixture_no.trim().to_string(),
        program_name: fields.program_name.trim().to_string(),
        plan_quantity,
        start_date,
        priority: fields.priority,
        readiness: rules
            .participating_roles
            .iter()
            .copied()
            .map(ReadinessItem::pending)
            .collect(),
        created_by: actor.id.clone(),
        created_at: now,
        production_started_at: None,
        production_started_by: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlanPriority, DEFAULT_PARTICIPATING_ROLES};
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 30, 0).unwrap()
    }

    fn ppc() -> Actor {
        Actor::new("1", Role::Ppc)
    }

    fn fields() -> NewPlan {
        NewPlan {
            machine_name: "Machine 1".to_string(),
            order_no: "ORD-2024-001".to_string(),
            part_number: "P-1001".to_string(),
            part_name: "Gear Housing".to_string(),
            plan_quantity: 500,
            start_date: NaiveDate::from_ymd_opt(2024, 3, 10),
            priority: PlanPriority::High,
            traveller_no: "TRV-001".to_string(),
            fixture_no: "FIX-001".to_string(),
            program_name: "PROG_001".to_string(),
        }
    }

    fn rules() -> CreationRules<'static> {
        CreationRules {
            participating_roles: &DEFAULT_PARTICIPATING_ROLES,
            machines: &[],
        }
    }

    fn new_plan() -> Plan {
        create_plan("PLAN-001".to_string(), fields(), &ppc(), &rules(), now()).unwrap()
    }

    fn all_ready(plan: &Plan) -> Plan {
        plan.participating_roles()
            .into_iter()
            .fold(plan.clone(), |p, role| {
                set_readiness(&p, &Actor::new("u", role), role, ReadinessStatus::Ready, now())
                    .unwrap()
            })
    }

    #[test]
    fn test_create_plan_builds_pending_checklist_in_order() {
        let plan = new_plan();

        assert_eq!(plan.readiness.len(), 5);
        assert_eq!(plan.participating_roles(), DEFAULT_PARTICIPATING_ROLES.to_vec());
        assert!(plan
            .readiness
            .iter()
            .all(|i| i.status == ReadinessStatus::Pending));
        assert_eq!(plan.status(), PlanStatus::Created);
        assert_eq!(plan.created_by, "1");
        assert_eq!(plan.created_at, now());
        assert!(plan.production_started_at.is_none());
    }

    #[test]
    fn test_create_plan_requires_ppc() {
        let admin = Actor::new("2", Role::Admin);
        let err = create_plan("PLAN-001".into(), fields(), &admin, &rules(), now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }

    #[test]
    fn test_create_plan_reports_every_invalid_field() {
        let mut f = fields();
        f.order_no = "  ".to_string();
        f.fixture_no.clear();
        f.plan_quantity = 0;
        f.start_date = None;

        let err = create_plan("PLAN-001".into(), f, &ppc(), &rules(), now()).unwrap_err();
        let WorkflowError::ValidationError(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("order_no")));
        assert!(errors.iter().any(|e| e.contains("fixture_no")));
        assert!(errors.iter().any(|e| e.contains("plan_quantity")));
        assert!(errors.iter().any(|e| e.contains("start_date")));
    }

    #[test]
    fn test_create_plan_rejects_unknown_machine() {
        let machines = vec!["Machine 2".to_string()];
        let rules = CreationRules {
            participating_roles: &DEFAULT_PARTICIPATING_ROLES,
            machines: &machines,
        };
        let err = create_plan("PLAN-001".into(), fields(), &ppc(), &rules, now()).unwrap_err();
        assert!(err.to_string().contains("not a known machine"));
    }

    #[test]
    fn test_create_plan_trims_identifiers() {
        let mut f = fields();
        f.part_name = "  Gear Housing ".to_string();
        let plan = create_plan("PLAN-001".into(), f, &ppc(), &rules(), now()).unwrap();
        assert_eq!(plan.part_name, "Gear Housing");
    }

    #[test]
    fn test_fully_ready_requires_every_item() {
        let mut plan = new_plan();
        assert!(!is_fully_ready(&plan));

        for item in plan.readiness.iter_mut().skip(1) {
            item.status = ReadinessStatus::Ready;
        }
        assert!(!is_fully_ready(&plan));
        assert_eq!(pending_count(&plan), 1);

        plan.readiness[0].status = ReadinessStatus::Ready;
        assert!(is_fully_ready(&plan));
        assert_eq!(derive_status(&plan), PlanStatus::ProductionReady);
    }

    #[test]
    fn test_my_item_absent_for_non_participant() {
        let plan = new_plan();
        assert!(my_item(&plan, Role::Ppc).is_none());
        assert_eq!(my_item(&plan, Role::QaEngineer).unwrap().label, "QA Status");
    }

    #[test]
    fn test_set_readiness_only_touches_owned_item() {
        let plan = new_plan();
        let qa = Actor::new("5", Role::QaEngineer);

        let updated =
            set_readiness(&plan, &qa, Role::QaEngineer, ReadinessStatus::Ready, now()).unwrap();

        for (before, after) in plan.readiness.iter().zip(&updated.readiness) {
            if after.role == Role::QaEngineer {
                assert_eq!(after.status, ReadinessStatus::Ready);
                assert_eq!(after.updated_by.as_deref(), Some("5"));
                assert_eq!(after.updated_at, Some(now()));
            } else {
                assert_eq!(before, after);
            }
        }
        // original is untouched
        assert_eq!(plan, new_plan());
    }

    #[test]
    fn test_set_readiness_rejects_other_roles_slot() {
        let plan = new_plan();
        let tool_crib = Actor::new("4", Role::ToolCrib);

        let err = set_readiness(
            &plan,
            &tool_crib,
            Role::QaEngineer,
            ReadinessStatus::Ready,
            now(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            WorkflowError::NotOwner {
                actor: Role::ToolCrib,
                owner: Role::QaEngineer
            }
        );
    }

    #[test]
    fn test_set_readiness_unknown_slot_is_not_found() {
        let plan = new_plan();
        let manager = Actor::new("8", Role::AssistantManager);
        let err = set_readiness(
            &plan,
            &manager,
            Role::AssistantManager,
            ReadinessStatus::Ready,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[test]
    fn test_regression_drops_status_back_to_created() {
        let ready = all_ready(&new_plan());
        assert_eq!(ready.status(), PlanStatus::ProductionReady);

        let npd = Actor::new("3", Role::NpdEngineer);
        let regressed = set_readiness(
            &ready,
            &npd,
            Role::NpdEngineer,
            ReadinessStatus::NotReady,
            now(),
        )
        .unwrap();
        assert_eq!(regressed.status(), PlanStatus::Created);
        assert!(!regressed.is_fully_ready());
    }

    #[test]
    fn test_start_production_stamps_and_locks() {
        let ready = all_ready(&new_plan());
        let started = start_production(&ready, &ppc(), now()).unwrap();

        assert_eq!(started.status(), PlanStatus::ProductionStarted);
        assert_eq!(started.production_started_at, Some(now()));
        assert_eq!(started.production_started_by.as_deref(), Some("1"));
        assert!(started.is_locked());

        let qa = Actor::new("5", Role::QaEngineer);
        let err = set_readiness(
            &started,
            &qa,
            Role::QaEngineer,
            ReadinessStatus::Pending,
            now(),
        )
        .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));

        let err = start_production(&started, &ppc(), now()).unwrap_err();
        assert!(matches!(err, WorkflowError::AlreadyStarted { .. }));
    }

    #[test]
    fn test_start_production_requires_ppc() {
        let ready = all_ready(&new_plan());
        let admin = Actor::new("2", Role::Admin);

        let err = start_production(&ready, &admin, now()).unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
        assert_eq!(ready.status(), PlanStatus::ProductionReady);
    }

    #[test]
    fn test_start_production_requires_full_readiness() {
        let plan = new_plan();
        let err = start_production(&plan, &ppc(), now()).unwrap_err();
        assert_eq!(
            err,
            WorkflowError::NotEligible {
                plan_id: "PLAN-001".to_string(),
                pending: 5
            }
        );
    }

    #[test]
    fn test_error_messages_explain_precondition() {
        let err = WorkflowError::ValidationError(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid plan: a; b");

        let err = WorkflowError::NotOwner {
            actor: Role::ToolCrib,
            owner: Role::QaEngineer,
        };
        assert_eq!(
            err.to_string(),
            "role TOOL_CRIB cannot update the QA_ENGINEER readiness item"
        );
    }
}
