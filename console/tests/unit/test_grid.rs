//! Grid unit tests

use std::sync::Arc;
use std::thread;

use deploy_console::cell::fsm::{CellEvent, CellFsm};
use deploy_console::cell::grid::Grid;
use deploy_console::cell::status::{CellStatus, DeploymentStatus};

use crate::mock::cell;

#[test]
fn test_unknown_cell_is_undeployed() {
    let grid = Grid::new();
    let id = cell("c1:n1:prod:1:app");

    assert!(grid.is_empty());
    assert_eq!(grid.status(&id), CellStatus::UNDEPLOYED);
    assert_eq!(grid.version(&id), None);
    assert!(grid.get(&id).is_none());
}

#[test]
fn test_cells_are_independent() {
    let grid = Grid::new();
    let a = cell("c1:n1:prod:1:app");
    let b = cell("c1:n1:prod:2:app");

    grid.insert(a.clone(), CellFsm::deployed("1.0"));
    grid.apply(&b, CellEvent::Deploy("2.0".to_string())).unwrap();

    assert_eq!(grid.len(), 2);
    assert_eq!(grid.status(&a), CellStatus::settled(DeploymentStatus::Deployed));
    assert_eq!(grid.status(&b), CellStatus::pending(DeploymentStatus::Deploying));
    assert_eq!(grid.version(&b).as_deref(), Some("2.0"));

    grid.apply(&b, CellEvent::Fail("refused".to_string())).unwrap();
    assert_eq!(grid.version(&a).as_deref(), Some("1.0"));
    assert_eq!(grid.version(&b), None);
}

#[test]
fn test_invalid_event_leaves_cell_unchanged() {
    let grid = Grid::new();
    let id = cell("c1:n1:prod:1:app");

    assert!(grid.apply(&id, CellEvent::Undeploy).is_err());
    assert_eq!(grid.status(&id), CellStatus::UNDEPLOYED);
}

#[test]
fn test_removed_cells_are_not_listed() {
    let grid = Grid::new();
    let kept = cell("c1:n1:prod:1:app");
    let removed = cell("c1:n1:prod:2:app");

    grid.insert(kept.clone(), CellFsm::deployed("1.0"));
    grid.insert(removed.clone(), CellFsm::deployed("1.0"));
    grid.apply(&removed, CellEvent::Remove).unwrap();
    assert_eq!(grid.cells(), vec![kept.clone(), removed.clone()]);

    grid.apply(&removed, CellEvent::Confirm).unwrap();
    assert_eq!(grid.cells(), vec![kept]);
    assert_eq!(grid.status(&removed), CellStatus::settled(DeploymentStatus::Removed));
}

#[test]
fn test_concurrent_events_on_different_cells() {
    let grid = Arc::new(Grid::new());

    let handles: Vec<_> = (0..8)
        .map(|index| {
            let grid = grid.clone();
            thread::spawn(move || {
                let id = cell(&format!("c1:n1:prod:{}:app", index));
                grid.apply(&id, CellEvent::Deploy(format!("1.{}", index)))
                    .unwrap();
                grid.apply(&id, CellEvent::Confirm).unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(grid.cells().len(), 8);
    for id in grid.cells() {
        let fsm = grid.get(&id).unwrap();
        assert_eq!(fsm.status(), CellStatus::settled(DeploymentStatus::Deployed));
        assert!(fsm.is_consistent());
    }
}
