//! Deployment status of a cell

use std::fmt;

use deployments_api::models::VersionStatus;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Undeployed,
    Deploying,
    Deployed,
    Undeploying,
    Balancing,
    Unbalancing,
    /// Terminal, the cell is gone from the grid
    Removed,
}

impl DeploymentStatus {
    pub const ALL: [DeploymentStatus; 7] = [
        DeploymentStatus::Undeployed,
        DeploymentStatus::Deploying,
        DeploymentStatus::Deployed,
        DeploymentStatus::Undeploying,
        DeploymentStatus::Balancing,
        DeploymentStatus::Unbalancing,
        DeploymentStatus::Removed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Undeployed => "undeployed",
            DeploymentStatus::Deploying => "deploying",
            DeploymentStatus::Deployed => "deployed",
            DeploymentStatus::Undeploying => "undeploying",
            DeploymentStatus::Balancing => "balancing",
            DeploymentStatus::Unbalancing => "unbalancing",
            DeploymentStatus::Removed => "removed",
        }
    }

    /// Whether the status names a transition in progress
    pub fn is_transitional(&self) -> bool {
        matches!(
            self,
            DeploymentStatus::Deploying
                | DeploymentStatus::Undeploying
                | DeploymentStatus::Balancing
                | DeploymentStatus::Unbalancing
        )
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status plus whether it is an unconfirmed optimistic guess
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellStatus {
    pub base: DeploymentStatus,
    pub pending: bool,
}

impl CellStatus {
    pub const UNDEPLOYED: CellStatus = CellStatus::settled(DeploymentStatus::Undeployed);

    /// Confirmed by the backend
    pub const fn settled(base: DeploymentStatus) -> Self {
        Self {
            base,
            pending: false,
        }
    }

    /// Shown before the backend confirmed it
    pub const fn pending(base: DeploymentStatus) -> Self {
        Self {
            base,
            pending: true,
        }
    }

    /// Same base, pending flag dropped
    pub fn confirmed(self) -> Self {
        Self::settled(self.base)
    }

    pub fn is(&self, base: DeploymentStatus) -> bool {
        self.base == base
    }

    /// Confirmed undeployed, the only status that accepts a drop
    pub fn is_free(&self) -> bool {
        *self == Self::UNDEPLOYED
    }
}

impl Default for CellStatus {
    fn default() -> Self {
        Self::UNDEPLOYED
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending {
            write!(f, "{} (pending)", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}

impl From<VersionStatus> for CellStatus {
    fn from(status: VersionStatus) -> Self {
        match status {
            VersionStatus::Undeployed => Self::settled(DeploymentStatus::Undeployed),
            VersionStatus::Deploying => Self::settled(DeploymentStatus::Deploying),
            VersionStatus::Deployed => Self::settled(DeploymentStatus::Deployed),
            VersionStatus::Undeploying => Self::settled(DeploymentStatus::Undeploying),
            VersionStatus::Balancing => Self::settled(DeploymentStatus::Balancing),
            VersionStatus::Unbalancing => Self::settled(DeploymentStatus::Unbalancing),
            VersionStatus::Removed => Self::settled(DeploymentStatus::Removed),
            VersionStatus::Deployee => Self::pending(DeploymentStatus::Deploying),
            VersionStatus::Undeployee => Self::pending(DeploymentStatus::Undeploying),
        }
    }
}
