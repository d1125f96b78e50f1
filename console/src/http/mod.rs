//! Deployments backend client

pub mod client;
pub mod deployments;

use async_trait::async_trait;
use deployments_api::models::{DeploymentCommand, GetDeploymentResponse};

use crate::cell::id::CellId;
use crate::errors::ConsoleError;

/// Backend operations the controllers depend on
#[async_trait]
pub trait DeploymentsApi: Send + Sync {
    /// Available and current versions of a cell
    async fn fetch_versions(&self, cell: &CellId) -> Result<GetDeploymentResponse, ConsoleError>;

    /// Post a command, `Ok` only on 204
    async fn send_command(
        &self,
        cell: &CellId,
        command: &DeploymentCommand,
    ) -> Result<(), ConsoleError>;
}
