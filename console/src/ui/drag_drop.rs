//! Drag and drop of deployments between cells
//!
//! At most one drag is in flight. Its source lives in a single slot that
//! `drag_end` always clears.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use deployments_api::models::DeploymentCommand;
use tracing::{debug, error, info, warn};

use crate::cell::fsm::CellEvent;
use crate::cell::grid::Grid;
use crate::cell::id::CellId;
use crate::cell::selector::HeaderId;
use crate::cell::status::CellStatus;
use crate::http::DeploymentsApi;

/// Copy leaves the source deployed, move undeploys it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropMode {
    Copy,
    Move,
}

impl DropMode {
    /// Mode from the negotiated drop effect, ambiguous effects move
    pub fn negotiate(effect: &str) -> Self {
        if effect.trim().eq_ignore_ascii_case("copy") {
            DropMode::Copy
        } else {
            DropMode::Move
        }
    }

    /// Drop effect to request for this mode
    pub fn effect(&self) -> &'static str {
        match self {
            DropMode::Copy => "copy",
            DropMode::Move => "move",
        }
    }
}

/// Marker on a cluster or node header while hovering a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMark {
    Ok,
    NotOk,
}

impl HeaderMark {
    pub fn class_name(&self) -> &'static str {
        match self {
            HeaderMark::Ok => "drop-ok",
            HeaderMark::NotOk => "drop-not-ok",
        }
    }
}

/// Why a drag cannot start or a target does not accept the drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NoDragInProgress,
    DragInProgress,
    InvalidSource,
    InvalidTarget,
    /// Source has nothing deployed
    EmptySource,
    /// Target is not undeployed
    Occupied(CellStatus),
    /// Target is on the source's own cluster and node
    SameLocation,
    /// Versions of the cell could not be fetched
    UnknownState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropVerdict {
    Allowed,
    Rejected(RejectReason),
}

impl DropVerdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, DropVerdict::Allowed)
    }

    /// Whether the front end should suppress the default reject behavior
    pub fn suppresses_default(&self) -> bool {
        self.is_allowed()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Nothing was sent
    Ignored(RejectReason),
    Copied,
    Moved,
    /// Target deploy failed, source untouched
    DeployFailed,
    /// Target deployed but the source could not be undeployed
    UndeployFailed,
}

#[derive(Debug, Default)]
struct DragState {
    source: Option<CellId>,
    source_styled: bool,
    marks: HashMap<HeaderId, HeaderMark>,
}

/// Drag/drop controller
///
/// Only the grid is updated. Open version menus of the source and target are
/// left as they were; `Console::drop` closes them.
pub struct DragDropController {
    api: Arc<dyn DeploymentsApi>,
    grid: Arc<Grid>,
    state: Mutex<DragState>,
}

impl DragDropController {
    pub fn new(api: Arc<dyn DeploymentsApi>, grid: Arc<Grid>) -> Self {
        Self {
            api,
            grid,
            state: Mutex::new(DragState::default()),
        }
    }

    /// Start dragging the deployment of `origin`
    pub fn drag_start(&self, origin: &str) -> Result<(), RejectReason> {
        let Some(source) = CellId::decode(origin) else {
            warn!("Not a deployment cell: {}", origin);
            return Err(RejectReason::InvalidSource);
        };
        if self.grid.version(&source).is_none() {
            debug!("Nothing deployed on {}", source);
            return Err(RejectReason::EmptySource);
        }

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(current) = &state.source {
            warn!("Drag of {} already in progress", current);
            return Err(RejectReason::DragInProgress);
        }
        debug!("Dragging {}", source);
        state.source = Some(source);
        state.source_styled = true;
        Ok(())
    }

    /// Check a candidate target and mark its headers
    pub fn drag_over(&self, candidate: &str) -> DropVerdict {
        let Some(source) = self.source() else {
            return DropVerdict::Rejected(RejectReason::NoDragInProgress);
        };

        let verdict = match CellId::decode(candidate) {
            Some(target) => match self.check(&source, &target) {
                Ok(()) => DropVerdict::Allowed,
                Err(reason) => DropVerdict::Rejected(reason),
            },
            None => DropVerdict::Rejected(RejectReason::InvalidTarget),
        };

        if let Some(target) = CellId::decode(candidate) {
            let mark = if verdict.is_allowed() {
                HeaderMark::Ok
            } else {
                HeaderMark::NotOk
            };
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.marks.insert(target.cluster_header(), mark);
            state.marks.insert(target.node_header(), mark);
        }
        verdict
    }

    /// Pointer left a candidate
    pub fn drag_leave(&self, candidate: &str) {
        if let Some(target) = CellId::decode(candidate) {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.marks.remove(&target.cluster_header());
            state.marks.remove(&target.node_header());
        }
    }

    /// Drop the dragged deployment on `target`
    pub async fn drop(&self, target: &str, effect: &str) -> DropOutcome {
        let mode = DropMode::negotiate(effect);
        let source = {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.marks.clear();
            state.source.clone()
        };
        let Some(source) = source else {
            return DropOutcome::Ignored(RejectReason::NoDragInProgress);
        };

        let outcome = match CellId::decode(target) {
            Some(target) => self.transfer(&source, &target, mode).await,
            None => DropOutcome::Ignored(RejectReason::InvalidTarget),
        };
        if let DropOutcome::Ignored(reason) = &outcome {
            debug!("Drop of {} on {} ignored: {:?}", source, target, reason);
            self.restore_source_style();
        }
        outcome
    }

    /// Copy or move the deployment of `source` to `target`
    pub async fn transfer(&self, source: &CellId, target: &CellId, mode: DropMode) -> DropOutcome {
        if let Err(reason) = self.check(source, target) {
            return DropOutcome::Ignored(reason);
        }
        let Some(version) = self.grid.version(source) else {
            return DropOutcome::Ignored(RejectReason::EmptySource);
        };
        if let Err(e) = self.grid.apply(target, CellEvent::Occupy(version.clone())) {
            warn!("Cannot deploy {} on {}: {}", version, target, e);
            return DropOutcome::Ignored(RejectReason::Occupied(self.grid.status(target)));
        }

        let deploy = DeploymentCommand::Deploy {
            version: version.clone(),
        };
        if let Err(e) = self.api.send_command(target, &deploy).await {
            error!("Failed to deploy {} on {}: {}", version, target, e);
            self.settle(target, CellEvent::Fail(e.to_string()));
            return DropOutcome::DeployFailed;
        }
        self.settle(target, CellEvent::Confirm);

        if mode == DropMode::Copy {
            info!("Copied {} from {} to {}", version, source, target);
            return DropOutcome::Copied;
        }

        if let Err(e) = self.grid.apply(source, CellEvent::Undeploy) {
            warn!("Cannot undeploy {} after moving it: {}", source, e);
            return DropOutcome::UndeployFailed;
        }
        match self.api.send_command(source, &DeploymentCommand::Undeploy).await {
            Ok(()) => {
                self.settle(source, CellEvent::Confirm);
                info!("Moved {} from {} to {}", version, source, target);
                DropOutcome::Moved
            }
            Err(e) => {
                error!("Deployed {} on {} but failed to undeploy {}: {}", version, target, source, e);
                self.settle(source, CellEvent::Fail(e.to_string()));
                DropOutcome::UndeployFailed
            }
        }
    }

    /// Reset to idle, whether or not a drop happened
    pub fn drag_end(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        *state = DragState::default();
    }

    /// Source of the drag in flight
    pub fn source(&self) -> Option<CellId> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.source.clone()
    }

    pub fn is_dragging(&self) -> bool {
        self.source().is_some()
    }

    /// Whether the source cell is drawn as being dragged
    pub fn source_styled(&self) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.source_styled
    }

    pub fn header_mark(&self, header: &HeaderId) -> Option<HeaderMark> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.marks.get(header).copied()
    }

    fn check(&self, source: &CellId, target: &CellId) -> Result<(), RejectReason> {
        if source.same_location(target) {
            return Err(RejectReason::SameLocation);
        }
        let status = self.grid.status(target);
        if !status.is_free() {
            return Err(RejectReason::Occupied(status));
        }
        Ok(())
    }

    fn settle(&self, cell: &CellId, event: CellEvent) {
        if let Err(e) = self.grid.apply(cell, event) {
            warn!("Unable to settle {}: {}", cell, e);
        }
    }

    fn restore_source_style(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.source_styled = false;
    }
}
