//! API models

use serde::{Deserialize, Serialize};

/// Status of a version as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Undeployed,
    Deploying,
    Deployed,
    Undeploying,
    Balancing,
    Unbalancing,
    Removed,
    /// Deploy issued but not yet confirmed (legacy)
    Deployee,
    /// Undeploy issued but not yet confirmed (legacy)
    Undeployee,
}

/// A version available for a deployment cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub name: String,
    pub status: VersionStatus,
}

/// Response of `GET /deployments/{id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDeploymentResponse {
    /// Cell id the versions belong to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default)]
    pub available: Vec<Version>,

    /// Name of the currently deployed version, empty if none
    #[serde(default)]
    pub current: String,
}

impl GetDeploymentResponse {
    /// The single entry that is not undeployed, if any
    pub fn active(&self) -> Option<&Version> {
        self.available
            .iter()
            .find(|v| v.status != VersionStatus::Undeployed)
    }
}

/// Value of the `mode` form parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    Deploy,
    Undeploy,
    Balance,
    Unbalance,
}

impl DeploymentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Deploy => "deploy",
            DeploymentMode::Undeploy => "undeploy",
            DeploymentMode::Balance => "balance",
            DeploymentMode::Unbalance => "unbalance",
        }
    }
}

/// Command posted to `POST /deployments/{id}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentCommand {
    Deploy { version: String },
    Undeploy,
    Balance,
    Unbalance,
    Remove { id: String },
}

impl DeploymentCommand {
    /// Form fields in the order the backend documents them
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        match self {
            DeploymentCommand::Deploy { version } => vec![
                ("mode", DeploymentMode::Deploy.as_str()),
                ("version", version.as_str()),
            ],
            DeploymentCommand::Undeploy => vec![("mode", DeploymentMode::Undeploy.as_str())],
            DeploymentCommand::Balance => vec![("mode", DeploymentMode::Balance.as_str())],
            DeploymentCommand::Unbalance => vec![("mode", DeploymentMode::Unbalance.as_str())],
            DeploymentCommand::Remove { id } => vec![("remove", id.as_str())],
        }
    }

    /// The `mode` parameter, absent for removals
    pub fn mode(&self) -> Option<DeploymentMode> {
        match self {
            DeploymentCommand::Deploy { .. } => Some(DeploymentMode::Deploy),
            DeploymentCommand::Undeploy => Some(DeploymentMode::Undeploy),
            DeploymentCommand::Balance => Some(DeploymentMode::Balance),
            DeploymentCommand::Unbalance => Some(DeploymentMode::Unbalance),
            DeploymentCommand::Remove { .. } => None,
        }
    }
}

/// Problem detail body returned with failed requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemDetail {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub instance: Option<String>,
}

impl ProblemDetail {
    /// Short human readable summary
    pub fn summary(&self) -> String {
        match (&self.title, &self.detail) {
            (Some(title), Some(detail)) => format!("{}: {}", title, detail),
            (Some(title), None) => title.clone(),
            (None, Some(detail)) => detail.clone(),
            (None, None) => self.kind.clone().unwrap_or_default(),
        }
    }
}
