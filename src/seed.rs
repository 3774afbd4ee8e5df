//! Demo plan set.
//!
//! Populates a board with a spread of plans across every lifecycle state. The
//! plans are created and advanced through the regular workflow calls, so the
//! seeded data obeys the same rules as live data.

use chrono::{DateTime, Duration, Utc};

use crate::state::BoardState;
use crate::types::{Actor, NewPlan, PlanPriority, ReadinessStatus, Role};
use crate::workflow::WorkflowError;
use ReadinessStatus::{NotReady, Pending, Ready};

const FALLBACK_MACHINES: [&str; 3] = ["Machine A", "Machine B", "Machine C"];

struct DemoPlan {
    part_number: &'static str,
    part_name: &'static str,
    quantity: i64,
    priority: PlanPriority,
    start_in_days: i64,
    /// Checklist statuses, applied in checklist order
    readiness: &'static [ReadinessStatus],
    /// Status for configured roles beyond the listed ones
    rest: ReadinessStatus,
    start_production: bool,
}

const DEMO_PLANS: &[DemoPlan] = &[
    DemoPlan {
        part_number: "P-1001",
        part_name: "Gear Housing",
        quantity: 500,
        priority: PlanPriority::High,
        start_in_days: -2,
        readiness: &[Ready, Ready, Ready, Ready, Ready],
        rest: Ready,
        start_production: true,
    },
    DemoPlan {
        part_number: "P-1002",
        part_name: "Shaft Coupling",
        quantity: 250,
        priority: PlanPriority::Medium,
        start_in_days: 1,
        readiness: &[Ready, Ready, Ready, Ready, Ready],
        rest: Ready,
        start_production: false,
    },
    DemoPlan {
        part_number: "P-1003",
        part_name: "Valve Body",
        quantity: 120,
        priority: PlanPriority::High,
        start_in_days: 2,
        readiness: &[Ready, Ready, NotReady, Ready, Pending],
        rest: Pending,
        start_production: false,
    },
    DemoPlan {
        part_number: "P-1004",
        part_name: "Bearing Cap",
        quantity: 800,
        priority: PlanPriority::Low,
        start_in_days: 5,
        readiness: &[],
        rest: Pending,
        start_production: false,
    },
    DemoPlan {
        part_number: "P-1005",
        part_name: "Pump Impeller",
        quantity: 60,
        priority: PlanPriority::Medium,
        start_in_days: 3,
        readiness: &[Ready, Ready, Pending, Pending, Pending],
        rest: Pending,
        start_production: false,
    },
    DemoPlan {
        part_number: "P-1006",
        part_name: "Flange Adapter",
        quantity: 300,
        priority: PlanPriority::Low,
        start_in_days: 7,
        readiness: &[Ready, Ready, Ready, Pending, Ready],
        rest: Pending,
        start_production: false,
    },
];

/// Id of the demo user holding `role` in the demo user directory
pub fn demo_user_id(role: Role) -> &'static str {
    match role {
        Role::Ppc => "1",
        Role::Admin => "2",
        Role::NpdEngineer => "3",
        Role::ToolCrib => "4",
        Role::QaEngineer => "5",
        Role::StoreExecutive => "6",
        Role::ProductionSupervisor => "7",
        Role::AssistantManager => "8",
    }
}

fn demo_actor(role: Role) -> Actor {
    Actor::new(demo_user_id(role), role)
}

/// Create the demo plans on `board`, returning how many were added
pub fn load_demo_plans(board: &mut BoardState, now: DateTime<Utc>) -> Result<usize, WorkflowError> {
    let machines: Vec<String> = if board.machines().is_empty() {
        FALLBACK_MACHINES.iter().map(|m| (*m).to_string()).collect()
    } else {
        board.machines().to_vec()
    };
    let roles = board.participating_roles().to_vec();
    let planner = demo_actor(Role::Ppc);

    for (n, demo) in DEMO_PLANS.iter().enumerate() {
        let seq = n + 1;
        let created_at = now - Duration::days(7 - n as i64);
        let fields = NewPlan {
            machine_name: machines[n % machines.len()].clone(),
            order_no: format!("ORD-2024-{:03}", seq),
            part_number: demo.part_number.to_string(),
            part_name: demo.part_name.to_string(),
            plan_quantity: demo.quantity,
            start_date: Some((now + Duration::days(demo.start_in_days)).date_naive()),
            priority: demo.priority,
            traveller_no: format!("TRV-{:03}", seq),
            fixture_no: format!("FIX-{:03}", seq),
            program_name: format!("PROG_{:03}", seq),
        };

        let plan_id = board.create_plan(&planner, fields, created_at)?.id.clone();

        for (offset, role) in roles.iter().enumerate() {
            let status = demo.readiness.get(offset).copied().unwrap_or(demo.rest);
            if status == Pending {
                continue;
            }
            let at = created_at + Duration::hours(2 * (offset as i64 + 1));
            board.set_readiness(&plan_id, &demo_actor(*role), *role, status, at)?;
        }

        if demo.start_production {
            board.start_production(&plan_id, &planner, created_at + Duration::days(1))?;
        }
    }

    board.notifications_mut().mark_all_read();
    Ok(DEMO_PLANS.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanningConfig;
    use crate::types::PlanStatus;

    fn seeded() -> BoardState {
        let planning = PlanningConfig {
            seed_demo_data: false,
            ..PlanningConfig::default()
        };
        let mut board = BoardState::new(&planning);
        load_demo_plans(&mut board, Utc::now()).unwrap();
        board
    }

    #[test]
    fn test_demo_covers_every_status() {
        let board = seeded();
        let counts = board.status_counts();
        assert_eq!(counts.total, 6);
        assert_eq!(counts.production_started, 1);
        assert_eq!(counts.production_ready, 1);
        assert_eq!(counts.created, 4);
    }

    #[test]
    fn test_started_demo_plan_has_audit_stamp() {
        let board = seeded();
        let started = board
            .plans()
            .iter()
            .find(|p| p.status() == PlanStatus::ProductionStarted)
            .unwrap();
        assert_eq!(started.production_started_by.as_deref(), Some("1"));
        assert!(started.production_started_at.unwrap() > started.created_at);
    }

    #[test]
    fn test_demo_notifications_start_read() {
        let board = seeded();
        assert!(!board.notifications().is_empty());
        assert_eq!(board.notifications().unread_count(), 0);
    }

    #[test]
    fn test_demo_seeds_with_extra_checklist_roles() {
        let mut roles = crate::types::DEFAULT_PARTICIPATING_ROLES.to_vec();
        roles.push(Role::AssistantManager);
        let planning = PlanningConfig {
            participating_roles: roles,
            seed_demo_data: false,
            ..PlanningConfig::default()
        };
        let mut board = BoardState::new(&planning);
        load_demo_plans(&mut board, Utc::now()).unwrap();

        let counts = board.status_counts();
        assert_eq!(counts.production_started, 1);
        assert_eq!(counts.production_ready, 1);
        let started = board.get("PLAN-001").unwrap();
        assert_eq!(started.readiness.len(), 6);
        assert!(started.is_fully_ready());
    }

    #[test]
    fn test_demo_seeds_with_fewer_checklist_roles() {
        let planning = PlanningConfig {
            participating_roles: vec![Role::QaEngineer, Role::StoreExecutive],
            seed_demo_data: false,
            ..PlanningConfig::default()
        };
        let mut board = BoardState::new(&planning);
        assert_eq!(load_demo_plans(&mut board, Utc::now()).unwrap(), 6);
        assert_eq!(board.status_counts().production_started, 1);
    }

    #[test]
    fn test_demo_user_ids_match_directory() {
        let directory = crate::users::UserDirectory::with_demo_users("password");
        for role in Role::all() {
            let user = directory.get(demo_user_id(*role)).unwrap();
            assert_eq!(user.role, *role);
        }
    }
}
