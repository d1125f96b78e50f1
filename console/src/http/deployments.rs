//! Deployment API client

use async_trait::async_trait;
use deployments_api::models::{DeploymentCommand, GetDeploymentResponse};

use crate::cell::id::CellId;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::http::DeploymentsApi;

fn deployment_path(cell: &CellId) -> String {
    format!("/deployments/{}", cell)
}

#[async_trait]
impl DeploymentsApi for HttpClient {
    async fn fetch_versions(&self, cell: &CellId) -> Result<GetDeploymentResponse, ConsoleError> {
        self.get_json(&deployment_path(cell)).await
    }

    async fn send_command(
        &self,
        cell: &CellId,
        command: &DeploymentCommand,
    ) -> Result<(), ConsoleError> {
        self.post_form(&deployment_path(cell), &command.form_fields())
            .await
    }
}
