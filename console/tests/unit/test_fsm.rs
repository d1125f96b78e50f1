//! FSM unit tests

use deploy_console::cell::fsm::{CellEvent, CellFsm};
use deploy_console::cell::icon::IconId;
use deploy_console::cell::status::{CellStatus, DeploymentStatus};

fn deploy(version: &str) -> CellEvent {
    CellEvent::Deploy(version.to_string())
}

#[test]
fn test_fsm_initial_state() {
    let fsm = CellFsm::new();
    assert_eq!(fsm.status(), CellStatus::UNDEPLOYED);
    assert!(fsm.version().is_none());
    assert!(fsm.error().is_none());
    assert_eq!(fsm.icon(), IconId::Minus);
    assert!(fsm.is_consistent());
}

#[test]
fn test_fsm_deploy_success_flow() {
    let mut fsm = CellFsm::new();

    // Undeployed -> Deploying (pending)
    fsm.process(deploy("1.2.4")).unwrap();
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Deploying));
    assert!(fsm.is_pending());
    assert_eq!(fsm.version(), Some("1.2.4"));

    // Deploying -> Deployed
    fsm.process(CellEvent::Confirm).unwrap();
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
    assert_eq!(fsm.icon(), IconId::OkCircle);
    assert!(fsm.is_consistent());
}

#[test]
fn test_fsm_deploy_failure_rolls_back() {
    let mut fsm = CellFsm::new();

    fsm.process(deploy("1.2.4")).unwrap();
    fsm.process(CellEvent::Fail("500 Internal Server Error".to_string()))
        .unwrap();

    assert_eq!(fsm.status(), CellStatus::UNDEPLOYED);
    assert_eq!(fsm.version(), None);
    assert_eq!(fsm.error(), Some("500 Internal Server Error"));
    assert!(fsm.is_consistent());
}

#[test]
fn test_fsm_redeploy_failure_keeps_prior_version() {
    let mut fsm = CellFsm::deployed("1.0");

    fsm.process(deploy("2.0")).unwrap();
    assert_eq!(fsm.version(), Some("2.0"));
    fsm.process(CellEvent::Fail("boom".to_string())).unwrap();

    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
    assert_eq!(fsm.version(), Some("1.0"));
}

#[test]
fn test_fsm_balance_unbalance() {
    let mut fsm = CellFsm::deployed("1.0");

    fsm.process(CellEvent::Balance).unwrap();
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Balancing));
    fsm.process(CellEvent::Confirm).unwrap();
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));

    fsm.process(CellEvent::Unbalance).unwrap();
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Unbalancing));
    fsm.process(CellEvent::Fail("nope".to_string())).unwrap();
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
    assert_eq!(fsm.version(), Some("1.0"));
}

#[test]
fn test_fsm_undeploy() {
    let mut fsm = CellFsm::deployed("1.0");

    fsm.process(CellEvent::Undeploy).unwrap();
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Undeploying));
    assert_eq!(fsm.version(), Some("1.0"));

    fsm.process(CellEvent::Confirm).unwrap();
    assert_eq!(fsm.status(), CellStatus::UNDEPLOYED);
    assert_eq!(fsm.version(), None);
}

#[test]
fn test_fsm_remove_is_terminal() {
    for mut fsm in [CellFsm::new(), CellFsm::deployed("1.0")] {
        fsm.process(CellEvent::Remove).unwrap();
        assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Removed));
        fsm.process(CellEvent::Confirm).unwrap();
        assert!(fsm.is_removed());
        assert_eq!(fsm.icon(), IconId::Trash);

        assert!(fsm.process(deploy("2.0")).is_err());
        assert!(fsm.process(CellEvent::Remove).is_err());
        assert!(fsm
            .process(CellEvent::Observe(CellStatus::UNDEPLOYED, None))
            .is_err());
    }
}

#[test]
fn test_fsm_failed_remove_restores() {
    let mut fsm = CellFsm::deployed("1.0");
    fsm.process(CellEvent::Remove).unwrap();
    fsm.process(CellEvent::Fail("gone wrong".to_string())).unwrap();
    assert_eq!(fsm.error(), Some("gone wrong"));
    assert_eq!(fsm.version(), Some("1.0"));
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
}

#[test]
fn test_fsm_invalid_transitions() {
    let mut fsm = CellFsm::new();

    // Nothing to undeploy, balance or confirm
    assert!(fsm.process(CellEvent::Undeploy).is_err());
    assert!(fsm.process(CellEvent::Balance).is_err());
    assert!(fsm.process(CellEvent::Unbalance).is_err());
    assert!(fsm.process(CellEvent::Confirm).is_err());
    assert!(fsm.process(CellEvent::Fail("x".to_string())).is_err());
    assert_eq!(fsm, CellFsm::new());

    // No second optimistic transition while one is pending
    fsm.process(deploy("1.0")).unwrap();
    assert!(fsm.process(deploy("2.0")).is_err());
    assert!(fsm.process(CellEvent::Remove).is_err());
    assert_eq!(fsm.version(), Some("1.0"));
}

#[test]
fn test_fsm_observe() {
    let mut fsm = CellFsm::new();

    fsm.process(CellEvent::Observe(
        CellStatus::settled(DeploymentStatus::Deployed),
        Some("1.3.4".to_string()),
    ))
    .unwrap();
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
    assert_eq!(fsm.version(), Some("1.3.4"));

    // Pending flags reported by the backend are not kept
    fsm.process(CellEvent::Observe(
        CellStatus::pending(DeploymentStatus::Undeploying),
        Some("1.3.4".to_string()),
    ))
    .unwrap();
    assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Undeploying));

    fsm.process(CellEvent::Observe(CellStatus::UNDEPLOYED, None))
        .unwrap();
    assert_eq!(fsm.version(), None);
    assert!(fsm.is_consistent());
}

#[test]
fn test_fsm_observe_does_not_clobber_pending() {
    let mut fsm = CellFsm::new();
    fsm.process(deploy("1.0")).unwrap();

    let result = fsm.process(CellEvent::Observe(CellStatus::UNDEPLOYED, None));
    assert!(result.is_err());
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Deploying));
}

#[test]
fn test_fsm_occupy_requires_free_cell() {
    let mut fsm = CellFsm::new();
    fsm.process(CellEvent::Occupy("2.0.0".to_string())).unwrap();
    assert_eq!(fsm.status(), CellStatus::pending(DeploymentStatus::Deploying));
    fsm.process(CellEvent::Confirm).unwrap();

    // Deployed in the meantime, a drop must not redeploy over it
    let mut occupied = CellFsm::deployed("1.0");
    assert!(occupied
        .process(CellEvent::Occupy("2.0.0".to_string()))
        .is_err());
    assert_eq!(occupied.version(), Some("1.0"));

    let mut busy = CellFsm::new();
    busy.process(deploy("1.0")).unwrap();
    assert!(busy.process(CellEvent::Occupy("2.0.0".to_string())).is_err());
}
