//! Version menu of a cell
//!
//! The menu is fetched lazily when first opened and lives until it is
//! closed. Every command is applied to the cell's status machine
//! optimistically and rolled back when the backend rejects it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use deployments_api::models::{DeploymentCommand, GetDeploymentResponse};
use tracing::{debug, error, info, warn};

use crate::cell::fsm::CellEvent;
use crate::cell::grid::Grid;
use crate::cell::icon::{icon_classes, icon_for, IconId};
use crate::cell::id::CellId;
use crate::cell::status::{CellStatus, DeploymentStatus};
use crate::errors::ConsoleError;
use crate::http::DeploymentsApi;

/// Fixed rows below the versions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Undeploy,
    Balance,
    Unbalance,
}

impl MenuAction {
    pub const ALL: [MenuAction; 3] = [MenuAction::Undeploy, MenuAction::Balance, MenuAction::Unbalance];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Undeploy => "undeploy",
            MenuAction::Balance => "balance",
            MenuAction::Unbalance => "unbalance",
        }
    }

    pub fn icon(&self) -> IconId {
        match self {
            MenuAction::Undeploy => IconId::BanCircle,
            MenuAction::Balance => IconId::Link,
            MenuAction::Unbalance => IconId::Unlink,
        }
    }
}

/// Rendered menu row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuRow {
    Version {
        name: String,
        status: CellStatus,
        icon: IconId,
    },
    Action(MenuAction),
}

impl MenuRow {
    pub fn label(&self) -> &str {
        match self {
            MenuRow::Version { name, .. } => name,
            MenuRow::Action(action) => action.label(),
        }
    }

    pub fn icon(&self) -> IconId {
        match self {
            MenuRow::Version { icon, .. } => *icon,
            MenuRow::Action(action) => action.icon(),
        }
    }

    /// Class list of the row's icon element
    pub fn icon_classes(&self) -> String {
        match self {
            MenuRow::Version { status, icon, .. } => icon_classes(*icon, *status),
            MenuRow::Action(action) => format!("icon ion-md-{}", action.icon()),
        }
    }
}

/// What a front end should draw for a cell's menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuView {
    Closed,
    Loading,
    Empty,
    Ready { rows: Vec<MenuRow>, expanded: bool },
}

impl MenuView {
    pub fn rows(&self) -> &[MenuRow] {
        match self {
            MenuView::Ready { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Status of a version row
    pub fn version_status(&self, version: &str) -> Option<CellStatus> {
        self.rows().iter().find_map(|row| match row {
            MenuRow::Version { name, status, .. } if name == version => Some(*status),
            _ => None,
        })
    }
}

/// Result of a user command, for information only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Backend confirmed the transition
    Applied,
    /// Backend rejected it and the previous state was restored
    RolledBack,
    /// Not a valid transition from the current state, nothing was sent
    Rejected,
}

#[derive(Debug, Clone)]
struct VersionRow {
    name: String,
    status: CellStatus,
    previous: Option<CellStatus>,
}

#[derive(Debug, Clone)]
enum MenuPhase {
    Loading,
    Empty,
    Ready(Vec<VersionRow>),
}

#[derive(Debug, Clone)]
struct Menu {
    generation: u64,
    phase: MenuPhase,
    expanded: bool,
    hovered: Option<String>,
}

/// Menu controller
pub struct MenuController {
    api: Arc<dyn DeploymentsApi>,
    grid: Arc<Grid>,
    menus: RwLock<HashMap<CellId, Menu>>,
    generations: AtomicU64,
}

impl MenuController {
    pub fn new(api: Arc<dyn DeploymentsApi>, grid: Arc<Grid>) -> Self {
        Self {
            api,
            grid,
            menus: RwLock::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }

    /// Open the menu, fetching versions unless it is already populated
    ///
    /// A populated menu is fetched again while the backend reports the cell
    /// in the middle of a transition.
    pub async fn open(&self, cell: &CellId) {
        let status = self.grid.status(cell);
        let in_progress = status.base.is_transitional() && !status.pending;

        let generation = {
            let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
            if let Some(menu) = menus.get_mut(cell) {
                match menu.phase {
                    MenuPhase::Ready(_) if in_progress => {
                        debug!("{} is {}, fetching versions again", cell, status);
                    }
                    MenuPhase::Ready(_) => {
                        menu.expanded = true;
                        return;
                    }
                    MenuPhase::Loading => return,
                    MenuPhase::Empty => {}
                }
            }
            let generation = self.generations.fetch_add(1, Ordering::Relaxed) + 1;
            menus.insert(
                cell.clone(),
                Menu {
                    generation,
                    phase: MenuPhase::Loading,
                    expanded: true,
                    hovered: None,
                },
            );
            generation
        };

        let result = self.api.fetch_versions(cell).await;

        let response = {
            let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
            let Some(menu) = menus
                .get_mut(cell)
                .filter(|menu| menu.generation == generation)
            else {
                debug!("Discarding stale versions of {}", cell);
                return;
            };

            match result {
                Ok(response) if answers(&response, cell) => {
                    menu.phase = MenuPhase::Ready(version_rows(&response));
                    response
                }
                Ok(response) => {
                    warn!(
                        "Discarding versions of {:?} received for {}",
                        response.id, cell
                    );
                    menu.phase = MenuPhase::Empty;
                    return;
                }
                Err(e) => {
                    error!("Failed to fetch versions of {}: {}", cell, e);
                    menu.phase = MenuPhase::Empty;
                    return;
                }
            }
        };

        self.observe(cell, &response);
    }

    /// Deploy a version from the menu
    pub async fn select(&self, cell: &CellId, version: &str) -> CommandOutcome {
        if let Err(e) = self.grid.apply(cell, CellEvent::Deploy(version.to_string())) {
            warn!("Cannot deploy {} on {}: {}", version, cell, e);
            return CommandOutcome::Rejected;
        }
        self.begin_row(cell, version, CellStatus::pending(DeploymentStatus::Deploying));

        let command = DeploymentCommand::Deploy {
            version: version.to_string(),
        };
        match self.api.send_command(cell, &command).await {
            Ok(()) => {
                self.confirm(cell);
                self.update_rows(cell, |row| {
                    if row.name == version {
                        row.status = CellStatus::settled(DeploymentStatus::Deployed);
                    } else if !row.status.is(DeploymentStatus::Undeployed) {
                        row.status = CellStatus::UNDEPLOYED;
                    }
                    row.previous = None;
                });
                self.collapse(cell);
                info!("Deployed {} on {}", version, cell);
                CommandOutcome::Applied
            }
            Err(e) => {
                self.roll_back(cell, &e);
                self.restore_row(cell, version);
                CommandOutcome::RolledBack
            }
        }
    }

    /// Highlight the row under the pointer, `None` clears it
    pub fn hover(&self, cell: &CellId, version: Option<&str>) {
        let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
        if let Some(menu) = menus.get_mut(cell) {
            menu.hovered = version.map(str::to_string);
        }
    }

    pub async fn undeploy(&self, cell: &CellId) -> CommandOutcome {
        self.command(cell, CellEvent::Undeploy, DeploymentCommand::Undeploy)
            .await
    }

    pub async fn balance(&self, cell: &CellId) -> CommandOutcome {
        self.command(cell, CellEvent::Balance, DeploymentCommand::Balance)
            .await
    }

    pub async fn unbalance(&self, cell: &CellId) -> CommandOutcome {
        self.command(cell, CellEvent::Unbalance, DeploymentCommand::Unbalance)
            .await
    }

    /// Undeploy and drop the cell from the grid
    pub async fn remove(&self, cell: &CellId) -> CommandOutcome {
        let command = DeploymentCommand::Remove {
            id: cell.to_string(),
        };
        self.command(cell, CellEvent::Remove, command).await
    }

    /// Run an action row
    pub async fn run_action(&self, cell: &CellId, action: MenuAction) -> CommandOutcome {
        match action {
            MenuAction::Undeploy => self.undeploy(cell).await,
            MenuAction::Balance => self.balance(cell).await,
            MenuAction::Unbalance => self.unbalance(cell).await,
        }
    }

    /// Discard the menu and its versions
    pub fn close(&self, cell: &CellId) {
        let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
        menus.remove(cell);
    }

    /// Current rendering of a cell's menu
    pub fn view(&self, cell: &CellId) -> MenuView {
        let menus = self.menus.read().unwrap_or_else(|e| e.into_inner());
        let Some(menu) = menus.get(cell) else {
            return MenuView::Closed;
        };

        match &menu.phase {
            MenuPhase::Loading => MenuView::Loading,
            MenuPhase::Empty => MenuView::Empty,
            MenuPhase::Ready(versions) => {
                let mut rows: Vec<MenuRow> = versions
                    .iter()
                    .map(|row| {
                        let hovered = menu.hovered.as_deref() == Some(row.name.as_str());
                        let icon = if hovered && row.status.is_free() {
                            IconId::AddCircle
                        } else {
                            icon_for(row.status)
                        };
                        MenuRow::Version {
                            name: row.name.clone(),
                            status: row.status,
                            icon,
                        }
                    })
                    .collect();
                rows.extend(MenuAction::ALL.into_iter().map(MenuRow::Action));
                MenuView::Ready {
                    rows,
                    expanded: menu.expanded,
                }
            }
        }
    }

    async fn command(
        &self,
        cell: &CellId,
        event: CellEvent,
        command: DeploymentCommand,
    ) -> CommandOutcome {
        let version = self.grid.version(cell);
        let pending = match self.grid.apply(cell, event) {
            Ok(status) => status,
            Err(e) => {
                warn!("Cannot run {:?} on {}: {}", command, cell, e);
                return CommandOutcome::Rejected;
            }
        };
        if let Some(version) = &version {
            self.begin_row(cell, version, pending);
        }

        match self.api.send_command(cell, &command).await {
            Ok(()) => {
                let status = self.confirm(cell);
                if status.is(DeploymentStatus::Removed) {
                    self.close(cell);
                } else if let Some(version) = &version {
                    self.update_rows(cell, |row| {
                        if &row.name == version {
                            row.status = status;
                            row.previous = None;
                        }
                    });
                }
                info!("{:?} confirmed on {}", command, cell);
                CommandOutcome::Applied
            }
            Err(e) => {
                self.roll_back(cell, &e);
                if let Some(version) = &version {
                    self.restore_row(cell, version);
                }
                CommandOutcome::RolledBack
            }
        }
    }

    /// Sync the cell with what the backend reports
    fn observe(&self, cell: &CellId, response: &GetDeploymentResponse) {
        let (status, version) = match response.active() {
            Some(active) => (CellStatus::from(active.status), Some(active.name.clone())),
            None if !response.current.is_empty() => (
                CellStatus::settled(DeploymentStatus::Deployed),
                Some(response.current.clone()),
            ),
            None => (CellStatus::UNDEPLOYED, None),
        };
        if let Err(e) = self.grid.apply(cell, CellEvent::Observe(status, version)) {
            debug!("Keeping local state of {}: {}", cell, e);
        }
    }

    fn confirm(&self, cell: &CellId) -> CellStatus {
        match self.grid.apply(cell, CellEvent::Confirm) {
            Ok(status) => status,
            Err(e) => {
                warn!("Unable to confirm {}: {}", cell, e);
                self.grid.status(cell)
            }
        }
    }

    fn roll_back(&self, cell: &CellId, cause: &ConsoleError) {
        error!("Command on {} failed, rolling back: {}", cell, cause);
        if let Err(e) = self.grid.apply(cell, CellEvent::Fail(cause.to_string())) {
            warn!("Unable to roll back {}: {}", cell, e);
        }
    }

    fn begin_row(&self, cell: &CellId, version: &str, status: CellStatus) {
        self.update_rows(cell, |row| {
            if row.name == version {
                row.previous = Some(row.status);
                row.status = status;
            }
        });
    }

    fn restore_row(&self, cell: &CellId, version: &str) {
        self.update_rows(cell, |row| {
            if row.name == version {
                if let Some(previous) = row.previous.take() {
                    row.status = previous;
                }
            }
        });
    }

    fn update_rows(&self, cell: &CellId, mut update: impl FnMut(&mut VersionRow)) {
        let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
        if let Some(Menu {
            phase: MenuPhase::Ready(rows),
            ..
        }) = menus.get_mut(cell)
        {
            rows.iter_mut().for_each(&mut update);
        }
    }

    fn collapse(&self, cell: &CellId) {
        let mut menus = self.menus.write().unwrap_or_else(|e| e.into_inner());
        if let Some(menu) = menus.get_mut(cell) {
            menu.expanded = false;
        }
    }
}

/// A response without an id is taken to answer the request
fn answers(response: &GetDeploymentResponse, cell: &CellId) -> bool {
    match response.id.as_deref() {
        Some(id) => CellId::decode(id).as_ref() == Some(cell),
        None => true,
    }
}

fn version_rows(response: &GetDeploymentResponse) -> Vec<VersionRow> {
    response
        .available
        .iter()
        .map(|version| VersionRow {
            name: version.name.clone(),
            status: CellStatus::from(version.status),
            previous: None,
        })
        .collect()
}
