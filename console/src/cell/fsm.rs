//! Finite State Machine for a deployment cell

use crate::cell::icon::{icon_for, IconId};
use crate::cell::status::{CellStatus, DeploymentStatus};
use crate::errors::ConsoleError;

/// Cell event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellEvent {
    /// Deploy a version (optimistic)
    Deploy(String),

    /// Deploy a version on a free cell only (optimistic)
    Occupy(String),

    /// Undeploy the current version (optimistic)
    Undeploy,

    /// Add to the load balancer (optimistic)
    Balance,

    /// Remove from the load balancer (optimistic)
    Unbalance,

    /// Undeploy and drop the cell from the grid (optimistic)
    Remove,

    /// Backend acknowledged the pending transition
    Confirm,

    /// Backend rejected the pending transition
    Fail(String),

    /// State reported by the backend
    Observe(CellStatus, Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Snapshot {
    status: CellStatus,
    version: Option<String>,
}

/// Cell FSM
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellFsm {
    status: CellStatus,
    version: Option<String>,
    rollback: Option<Snapshot>,
    error: Option<String>,
}

impl CellFsm {
    /// Create a new FSM in undeployed state
    pub fn new() -> Self {
        Self {
            status: CellStatus::UNDEPLOYED,
            version: None,
            rollback: None,
            error: None,
        }
    }

    /// Create a FSM with a confirmed deployed version
    pub fn deployed(version: impl Into<String>) -> Self {
        Self {
            status: CellStatus::settled(DeploymentStatus::Deployed),
            version: Some(version.into()),
            rollback: None,
            error: None,
        }
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    /// Version name, `None` when undeployed
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Reason of the last rolled back transition
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status.pending
    }

    pub fn is_removed(&self) -> bool {
        self.status.is(DeploymentStatus::Removed)
    }

    pub fn icon(&self) -> IconId {
        icon_for(self.status)
    }

    /// Undeployed cells carry no version, other live cells do
    pub fn is_consistent(&self) -> bool {
        match self.status.base {
            DeploymentStatus::Undeployed => self.version.is_none(),
            DeploymentStatus::Removed => true,
            _ => self.version.is_some(),
        }
    }

    /// Process an event and transition state
    pub fn process(&mut self, event: CellEvent) -> Result<CellStatus, ConsoleError> {
        use DeploymentStatus::*;

        let status = self.status;
        match (status.base, status.pending, event) {
            // Optimistic transitions from settled states
            (Undeployed | Deployed, false, CellEvent::Deploy(version)) => {
                self.begin(CellStatus::pending(Deploying));
                self.version = Some(version);
            }
            (Undeployed, false, CellEvent::Occupy(version)) => {
                self.begin(CellStatus::pending(Deploying));
                self.version = Some(version);
            }
            (Deployed, false, CellEvent::Undeploy) => self.begin(CellStatus::pending(Undeploying)),
            (Deployed, false, CellEvent::Balance) => self.begin(CellStatus::pending(Balancing)),
            (Deployed, false, CellEvent::Unbalance) => self.begin(CellStatus::pending(Unbalancing)),
            (base, false, CellEvent::Remove) if base != Removed => {
                self.begin(CellStatus::pending(Removed))
            }

            // Confirmation of a pending transition
            (Deploying | Balancing | Unbalancing, true, CellEvent::Confirm) => {
                self.settle(CellStatus::settled(Deployed))
            }
            (Undeploying, true, CellEvent::Confirm) => {
                self.settle(CellStatus::UNDEPLOYED);
                self.version = None;
            }
            (Removed, true, CellEvent::Confirm) => self.settle(CellStatus::settled(Removed)),

            // Rollback of a pending transition
            (_, true, CellEvent::Fail(reason)) => {
                if let Some(snapshot) = self.rollback.take() {
                    self.status = snapshot.status;
                    self.version = snapshot.version;
                } else {
                    self.status = status.confirmed();
                }
                self.error = Some(reason);
            }

            // Backend state, never clobbers an optimistic guess
            (base, false, CellEvent::Observe(observed, version)) if base != Removed => {
                let observed = observed.confirmed();
                self.version = match observed.base {
                    Undeployed => None,
                    _ => version.or_else(|| self.version.take()),
                };
                self.status = observed;
            }

            // Invalid transitions
            (_, _, event) => {
                return Err(ConsoleError::InvalidTransition(format!(
                    "{} -> {:?}",
                    status, event
                )));
            }
        }

        Ok(self.status)
    }

    fn begin(&mut self, next: CellStatus) {
        self.rollback = Some(Snapshot {
            status: self.status,
            version: self.version.clone(),
        });
        self.error = None;
        self.status = next;
    }

    fn settle(&mut self, next: CellStatus) {
        self.rollback = None;
        self.status = next;
    }
}

impl Default for CellFsm {
    fn default() -> Self {
        Self::new()
    }
}
