//! Console command tests

use std::sync::Arc;

use deploy_console::app::run::{execute, Command};
use deploy_console::app::state::Console;
use deploy_console::cell::status::{CellStatus, DeploymentStatus};
use deploy_console::ui::drag_drop::{DropMode, DropOutcome, RejectReason};
use deploy_console::ui::menu::MenuView;
use deployments_api::models::{DeploymentCommand, DeploymentMode, VersionStatus};

use crate::mock::{cell, response, MockApi};

fn console(api: &Arc<MockApi>) -> Console {
    Console::new(api.clone())
}

#[tokio::test]
async fn test_versions_command() {
    let api = MockApi::new();
    let id = cell("c1:n1:prod:1:app");
    api.set_versions(&id, response(&[("1.2.4", VersionStatus::Undeployed)]));
    let console = console(&api);

    assert!(execute(&console, Command::Versions(id.clone())).await);
    assert!(matches!(console.menu().view(&id), MenuView::Ready { .. }));

    // Unknown cell answers 404
    assert!(!execute(&console, Command::Versions(cell("c9:n9:prod:1:app"))).await);
}

#[tokio::test]
async fn test_deploy_command() {
    let api = MockApi::new();
    let id = cell("c1:n1:prod:1:app");
    api.set_versions(&id, response(&[("1.2.4", VersionStatus::Undeployed)]));
    let console = console(&api);

    let command = Command::Deploy {
        cell: id.clone(),
        version: "1.2.4".to_string(),
    };
    assert!(execute(&console, command).await);
    assert_eq!(
        console.grid().status(&id),
        CellStatus::settled(DeploymentStatus::Deployed)
    );
}

#[tokio::test]
async fn test_failed_command_reports_failure() {
    let api = MockApi::new();
    let id = cell("c1:n1:prod:1:app");
    api.set_versions(&id, response(&[("1.3.4", VersionStatus::Deployed)]));
    api.fail_command(&id, Some(DeploymentMode::Balance), 500);
    let console = console(&api);

    assert!(!execute(&console, Command::Balance(id.clone())).await);
    assert_eq!(
        console.grid().status(&id),
        CellStatus::settled(DeploymentStatus::Deployed)
    );
}

#[tokio::test]
async fn test_copy_between_cells() {
    let api = MockApi::new();
    let from = cell("c1:n1:prod:1:app");
    let to = cell("c1:n2:prod:1:app");
    api.set_versions(&from, response(&[("2.0.0", VersionStatus::Deployed)]));
    api.set_versions(&to, response(&[("2.0.0", VersionStatus::Undeployed)]));
    let console = console(&api);

    let outcome = console.drag(&from, &to, DropMode::Copy).await;

    assert_eq!(outcome, DropOutcome::Copied);
    assert_eq!(
        api.commands(),
        vec![(
            to.clone(),
            DeploymentCommand::Deploy {
                version: "2.0.0".to_string()
            }
        )]
    );
    assert_eq!(api.fetch_count(), 2);
    assert!(!console.drag_drop().is_dragging());
    assert_eq!(console.menu().view(&from), MenuView::Closed);
}

#[tokio::test]
async fn test_move_command_onto_deployed_cell_is_ignored() {
    let api = MockApi::new();
    let from = cell("c1:n1:prod:1:app");
    let to = cell("c1:n2:prod:1:app");
    api.set_versions(&from, response(&[("2.0.0", VersionStatus::Deployed)]));
    api.set_versions(&to, response(&[("1.0.0", VersionStatus::Deployed)]));
    let console = console(&api);

    let command = Command::Transfer {
        from: from.clone(),
        to: to.clone(),
        mode: DropMode::Move,
    };
    assert!(!execute(&console, command).await);
    assert!(api.commands().is_empty());

    let outcome = console.drag(&from, &to, DropMode::Move).await;
    assert_eq!(
        outcome,
        DropOutcome::Ignored(RejectReason::Occupied(CellStatus::settled(
            DeploymentStatus::Deployed
        )))
    );
}

#[tokio::test]
async fn test_drag_onto_unreachable_target_is_ignored() {
    let api = MockApi::new();
    let from = cell("c1:n1:prod:1:app");
    let to = cell("c1:n2:prod:1:app");
    api.set_versions(&from, response(&[("2.0.0", VersionStatus::Deployed)]));
    let console = console(&api);

    let outcome = console.drag(&from, &to, DropMode::Move).await;

    assert_eq!(outcome, DropOutcome::Ignored(RejectReason::UnknownState));
    assert!(api.commands().is_empty());
    assert_eq!(
        console.grid().status(&from),
        CellStatus::settled(DeploymentStatus::Deployed)
    );
    assert!(!console.drag_drop().is_dragging());
}

#[tokio::test]
async fn test_drop_discards_changed_menus() {
    let api = MockApi::new();
    let from = cell("c1:n1:prod:1:app");
    let to = cell("c1:n2:prod:1:app");
    api.set_versions(&from, response(&[("2.0.0", VersionStatus::Deployed)]));
    api.set_versions(&to, response(&[("2.0.0", VersionStatus::Undeployed)]));
    let console = console(&api);
    console.menu().open(&from).await;
    console.menu().open(&to).await;

    console.drag_drop().drag_start(&from.to_string()).unwrap();
    let outcome = console.drop(&to.to_string(), "move").await;
    console.drag_drop().drag_end();

    assert_eq!(outcome, DropOutcome::Moved);
    assert_eq!(console.menu().view(&from), MenuView::Closed);
    assert_eq!(console.menu().view(&to), MenuView::Closed);

    // Reopening shows what the backend reports now
    api.set_versions(&to, response(&[("2.0.0", VersionStatus::Deployed)]));
    console.menu().open(&to).await;
    assert_eq!(
        console.menu().view(&to).version_status("2.0.0"),
        Some(CellStatus::settled(DeploymentStatus::Deployed))
    );
}
