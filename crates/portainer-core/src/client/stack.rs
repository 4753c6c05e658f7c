use reqwest::Method;
use serde::Serialize;

use super::PortainerClient;
use crate::error::{Error, Result};
use crate::models::{RegularStack, StackFile};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateStandaloneStackPayload<'a> {
    name: &'a str,
    stack_file_content: &'a str,
    env: &'a [serde_json::Value],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStackPayload<'a> {
    stack_file_content: &'a str,
    env: &'a [serde_json::Value],
    prune: bool,
    pull_image: bool,
}

impl PortainerClient {
    /// List all regular (non-edge) stacks.
    pub async fn list_regular_stacks(&self) -> Result<Vec<RegularStack>> {
        let svc = self.stacks_svc()?;
        let stacks = svc
            .send_json::<Vec<RegularStack>>(svc.request(Method::GET, "/stacks"))
            .await?;
        Ok(stacks.unwrap_or_default())
    }

    /// Compose file content of a regular stack.
    pub async fn get_regular_stack_file(&self, id: i64) -> Result<String> {
        let svc = self.stacks_svc()?;
        let file = svc
            .send_json::<StackFile>(svc.request(Method::GET, &format!("/stacks/{id}/file")))
            .await?
            .ok_or(Error::EmptyResponse("stack file"))?;
        Ok(file.content)
    }

    /// Deploy a standalone compose stack on `endpoint_id`. Returns the id the
    /// backend assigned.
    pub async fn create_regular_stack(
        &self,
        name: &str,
        file: &str,
        endpoint_id: i64,
    ) -> Result<i64> {
        let svc = self.stacks_svc()?;
        let req = svc
            .request(Method::POST, "/stacks/create/standalone/string")
            .query(&[("endpointId", endpoint_id)])
            .json(&CreateStandaloneStackPayload {
                name,
                stack_file_content: file,
                env: &[],
            });
        let created = svc
            .send_json::<RegularStack>(req)
            .await?
            .ok_or(Error::EmptyResponse("create stack"))?;
        Ok(created.id)
    }

    /// Replace the compose file of a regular stack and redeploy it.
    pub async fn update_regular_stack(
        &self,
        id: i64,
        endpoint_id: i64,
        file: &str,
        pull_image: bool,
    ) -> Result<()> {
        let svc = self.stacks_svc()?;
        let req = svc
            .request(Method::PUT, &format!("/stacks/{id}"))
            .query(&[("endpointId", endpoint_id)])
            .json(&UpdateStackPayload {
                stack_file_content: file,
                env: &[],
                prune: false,
                pull_image,
            });
        svc.send_empty(req).await
    }

    pub async fn start_regular_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        let svc = self.stacks_svc()?;
        let req = svc
            .request(Method::POST, &format!("/stacks/{id}/start"))
            .query(&[("endpointId", endpoint_id)]);
        svc.send_empty(req).await
    }

    pub async fn stop_regular_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        let svc = self.stacks_svc()?;
        let req = svc
            .request(Method::POST, &format!("/stacks/{id}/stop"))
            .query(&[("endpointId", endpoint_id)]);
        svc.send_empty(req).await
    }

    pub async fn delete_regular_stack(&self, id: i64, endpoint_id: i64) -> Result<()> {
        let svc = self.stacks_svc()?;
        let req = svc
            .request(Method::DELETE, &format!("/stacks/{id}"))
            .query(&[("endpointId", endpoint_id)]);
        svc.send_empty(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn regular_stack_calls_require_stacks_service() {
        let client = PortainerClient::unconfigured();

        assert!(matches!(
            client.list_regular_stacks().await,
            Err(Error::NotInitialized("stacks"))
        ));
        assert!(matches!(
            client.get_regular_stack_file(1).await,
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(
            client.create_regular_stack("a", "b", 1).await,
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(
            client.update_regular_stack(1, 1, "b", true).await,
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(
            client.start_regular_stack(1, 1).await,
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(
            client.stop_regular_stack(1, 1).await,
            Err(Error::NotInitialized(_))
        ));
        assert!(matches!(
            client.delete_regular_stack(1, 1).await,
            Err(Error::NotInitialized(_))
        ));
    }

    #[test]
    fn update_payload_uses_backend_field_names() {
        let body = serde_json::to_value(UpdateStackPayload {
            stack_file_content: "services: {}",
            env: &[],
            prune: false,
            pull_image: true,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "stackFileContent": "services: {}",
                "env": [],
                "prune": false,
                "pullImage": true
            })
        );
    }
}
