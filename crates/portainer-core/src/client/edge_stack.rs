use reqwest::Method;
use serde::Serialize;

use super::PortainerClient;
use crate::error::{Error, Result};
use crate::models::{EdgeStack, StackFile};

/// Docker Compose deployment, as opposed to Kubernetes manifests (1).
const EDGE_DEPLOYMENT_COMPOSE: i64 = 0;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEdgeStackPayload<'a> {
    name: &'a str,
    stack_file_content: &'a str,
    edge_groups: &'a [i64],
    deployment_type: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEdgeStackPayload<'a> {
    stack_file_content: &'a str,
    edge_groups: &'a [i64],
    deployment_type: i64,
    update_version: bool,
}

impl PortainerClient {
    pub async fn list_edge_stacks(&self) -> Result<Vec<EdgeStack>> {
        let svc = self.edge_stacks_svc()?;
        let stacks = svc
            .send_json::<Vec<EdgeStack>>(svc.request(Method::GET, "/edge_stacks"))
            .await?;
        Ok(stacks.unwrap_or_default())
    }

    pub async fn inspect_edge_stack_file(&self, id: i64) -> Result<String> {
        let svc = self.edge_stacks_svc()?;
        let file = svc
            .send_json::<StackFile>(
                svc.request(Method::GET, &format!("/edge_stacks/{id}/file")),
            )
            .await?
            .ok_or(Error::EmptyResponse("edge stack file"))?;
        Ok(file.content)
    }

    /// Create a compose edge stack targeting the given edge groups.
    pub async fn create_edge_stack_from_string(
        &self,
        name: &str,
        file: &str,
        group_ids: &[i64],
    ) -> Result<i64> {
        let svc = self.edge_stacks_svc()?;
        let req = svc
            .request(Method::POST, "/edge_stacks/create/string")
            .json(&CreateEdgeStackPayload {
                name,
                stack_file_content: file,
                edge_groups: group_ids,
                deployment_type: EDGE_DEPLOYMENT_COMPOSE,
            });
        let created = svc
            .send_json::<EdgeStack>(req)
            .await?
            .ok_or(Error::EmptyResponse("create edge stack"))?;
        Ok(created.id)
    }

    /// Replace file and target groups of an edge stack. Always bumps the
    /// stack version so agents redeploy.
    pub async fn update_edge_stack_file(
        &self,
        id: i64,
        file: &str,
        group_ids: &[i64],
    ) -> Result<()> {
        let svc = self.edge_stacks_svc()?;
        let req = svc
            .request(Method::PUT, &format!("/edge_stacks/{id}"))
            .json(&UpdateEdgeStackPayload {
                stack_file_content: file,
                edge_groups: group_ids,
                deployment_type: EDGE_DEPLOYMENT_COMPOSE,
                update_version: true,
            });
        svc.send_empty(req).await
    }
}
